mod common;

use mitake::{
    ClientId, MessageText, MitakeClient, RawPhoneNumber, SendBatch, SendOptions, SendSms,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    // Comma-separated list of recipients.
    let phones = common::required_env("MITAKE_PHONES")?;

    let client = MitakeClient::from_env()?;
    let mut messages = Vec::new();
    for (idx, phone) in phones.split(',').map(str::trim).enumerate() {
        messages.push(SendSms::with_options(
            RawPhoneNumber::new(phone)?,
            MessageText::new(format!("批次測試簡訊 #{}", idx + 1))?,
            SendOptions {
                client_id: Some(ClientId::new(format!("demo-{}", idx + 1))?),
                ..Default::default()
            },
        ));
    }

    let response = client.send_batch_sms(SendBatch::new(messages)?)?;
    for item in &response.results {
        println!(
            "{}: status_code={}, msgid={:?}, duplicate={}",
            item.client_id, item.status_code, item.msgid, item.duplicate
        );
    }
    println!("account_points: {:?}", response.account_points);

    Ok(())
}
