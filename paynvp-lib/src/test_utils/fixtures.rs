//! Canned PayPal payloads.

use crate::FlatEntry;

/// Successful Adaptive Payments `Pay` response.
pub const PAY_SUCCESS_BODY: &str = "responseEnvelope.timestamp=2011-11-23T08%3A49%3A03.343-08%3A00\
    &responseEnvelope.ack=Success\
    &responseEnvelope.correlationId=c8b7bb7fb1a21\
    &responseEnvelope.build=2279004\
    &payKey=AP-7H6071842X7329545\
    &paymentExecStatus=CREATED";

/// Failed `Pay` response carrying two errors.
pub const PAY_FAILURE_BODY: &str = "responseEnvelope.timestamp=2011-11-23T08%3A52%3A19.062-08%3A00\
    &responseEnvelope.ack=Failure\
    &responseEnvelope.correlationId=4e1b2a0c0d3f5\
    &responseEnvelope.build=2279004\
    &error(0).errorId=580022\
    &error(0).domain=PLATFORM\
    &error(0).subdomain=Application\
    &error(0).severity=Error\
    &error(0).category=Application\
    &error(0).message=Invalid+request+parameter\
    &error(0).parameter(0)=currencyCode\
    &error(0).parameter(1)=XYZ\
    &error(1).errorId=580001\
    &error(1).severity=Error\
    &error(1).message=Invalid+request";

/// Flat entries of a two-receiver `Pay` request.
pub fn pay_request_entries() -> Vec<FlatEntry> {
    vec![
        FlatEntry::single("requestEnvelope.errorLanguage", "en_US"),
        FlatEntry::single("actionType", "PAY"),
        FlatEntry::single("currencyCode", "USD"),
        FlatEntry::single("cancelUrl", "https://example.com/cancel"),
        FlatEntry::single("returnUrl", "https://example.com/return"),
        FlatEntry::single("receiverList.receiver(0).email", "a@x.com"),
        FlatEntry::single("receiverList.receiver(0).amount", "10.00"),
        FlatEntry::single("receiverList.receiver(1).email", "b@x.com"),
        FlatEntry::single("receiverList.receiver(1).amount", "5.00"),
    ]
}

/// A key nesting `depth` plain segments.
pub fn deep_key(depth: usize) -> String {
    vec!["k"; depth].join(".")
}
