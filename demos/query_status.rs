mod common;

use mitake::{MessageId, MitakeClient, StatusQuery};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    // Comma-separated msgids returned by an earlier send.
    let ids = common::required_env("MITAKE_MSGIDS")?;

    let client = MitakeClient::from_env()?;
    let ids = ids
        .split(',')
        .map(|id| MessageId::new(id.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    let response = client.query_message_status(StatusQuery::new(ids)?)?;
    for (msgid, status) in &response.messages {
        let description = status
            .status_code
            .known()
            .map(|known| known.description())
            .unwrap_or("unknown status");
        println!(
            "{msgid}: {} ({description}) at {:?}",
            status.status_code, status.status_time
        );
    }

    Ok(())
}
