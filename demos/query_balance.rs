mod common;

use mitake::MitakeClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    let client = MitakeClient::from_env()?;
    let balance = client.query_account_balance()?;
    println!("account_points: {}", balance.account_points);

    Ok(())
}
