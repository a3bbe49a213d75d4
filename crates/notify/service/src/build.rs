//! Delivery unit construction.

use notify_core::{DeliveryUnit, PushRequest};

/// Expand a request into one delivery unit per recipient.
///
/// Unit `i` always belongs to `request.recipients[i]`; recipients are never
/// reordered, merged or dropped.
pub fn build(request: &PushRequest) -> Vec<DeliveryUnit<'_>> {
    request
        .recipients
        .iter()
        .map(|token| DeliveryUnit {
            token,
            data: &request.data,
            message: request.message.as_ref(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use notify_core::Message;

    use super::*;

    #[test]
    fn test_keeps_order_and_duplicates() {
        let request = PushRequest {
            recipients: vec!["t1".into(), "t2".into(), "t1".into()],
            data: [("k".to_string(), "v".to_string())].into(),
            message: Some(Message {
                title: "Hi".into(),
                body: "there".into(),
            }),
        };

        let units = build(&request);
        let tokens: Vec<&str> = units.iter().map(|u| u.token).collect();
        assert_eq!(tokens, ["t1", "t2", "t1"]);
        assert!(units.iter().all(|u| u.data["k"] == "v"));
        assert!(units.iter().all(|u| u.message == request.message.as_ref()));
    }

    #[test]
    fn test_unit_without_template_still_carries_data() {
        let request = PushRequest {
            recipients: vec!["t1".into()],
            data: [("k".to_string(), "v".to_string())].into(),
            message: None,
        };

        let units = build(&request);
        assert_eq!(units.len(), 1);
        assert!(units[0].message.is_none());
        assert_eq!(units[0].data.len(), 1);
    }
}
