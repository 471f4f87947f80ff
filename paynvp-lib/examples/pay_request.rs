//! Build an Adaptive Payments `Pay` request and read a canned response.
//!
//! Run with: `cargo run --example pay_request`

use paynvp_lib::prelude::*;
use paynvp_lib::wire;

fn main() -> Result<()> {
    let config = ServiceConfig::sandbox();

    let mut request = Request::with_error_language(config.error_language.clone());
    request
        .set("actionType", "PAY")?
        .set("currencyCode", "USD")?
        .set("returnUrl", "https://example.com/return")?
        .set("cancelUrl", "https://example.com/cancel")?
        .push(
            "receiverList.receiver",
            Value::mapping_from([
                ("email", Value::from("seller@example.com")),
                ("amount", Value::from("10.00")),
            ]),
        )?;

    let body = request.render(&NvpFormat, &config.codec)?;
    println!("POST {}/AdaptivePayments/Pay", config.endpoint());
    println!("{body}\n");

    let reply = "responseEnvelope.ack=Success&payKey=AP-7H6071842X7329545";
    let response = NvpResponse::new(wire::parse(reply)?);
    println!("ack: {:?}", response.ack());
    if let Some(url) = response.pay_approval_url(config.environment) {
        println!("approve at: {url}");
    }

    for entry in encode(request.params())? {
        println!("  {entry}");
    }
    Ok(())
}
