mod common;

use mitake::{MessageText, MitakeClient, PhoneNumber, SendOptions, SendSms, Validity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();

    let phone_raw = common::required_env("MITAKE_PHONE")?;
    let message = std::env::var("MITAKE_MESSAGE")
        .unwrap_or_else(|_| "你好，這是 mitake 範例程式的測試簡訊。".to_owned());

    let client = MitakeClient::from_env()?;
    let phone = PhoneNumber::parse(phone_raw)?;
    let text = MessageText::new(message)?;
    let request = SendSms::with_options(
        phone.into(),
        text,
        SendOptions {
            validity: Some(Validity::seconds(3600)?),
            ..Default::default()
        },
    );

    let response = client.send_sms(request)?;
    println!(
        "status_code: {}, msgid: {:?}, account_points: {:?}",
        response.status_code, response.msgid, response.account_points
    );

    Ok(())
}
