//! Post-payment redirect for the payer's browser.

use serde::Serialize;
use url::form_urlencoded;

use super::{MerchantReference, RequestStatus};

/// Path of the merchant's payment success page.
pub const PAYMENT_SUCCESS_PATH: &str = "payment-success";

/// Where the payer lands after an authorized payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessRedirect {
    pub redirect_to: String,
    pub status: RequestStatus,
}

impl SuccessRedirect {
    /// Builds the success redirect for a merchant reference.
    ///
    /// `redirect_to` is carried as an extra query parameter when present.
    pub fn for_reference(reference: &MerchantReference, redirect_to: Option<&str>) -> Self {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("doctype", &reference.reference_type)
            .append_pair("docname", &reference.reference_id);
        if let Some(target) = redirect_to.filter(|t| !t.is_empty()) {
            query.append_pair("redirect_to", target);
        }
        Self {
            redirect_to: format!("{}?{}", PAYMENT_SUCCESS_PATH, query.finish()),
            status: RequestStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> MerchantReference {
        MerchantReference::new("Sales Invoice", "SINV-0001").unwrap()
    }

    #[test]
    fn builds_url_without_redirect_target() {
        let redirect = SuccessRedirect::for_reference(&reference(), None);

        assert_eq!(
            redirect.redirect_to,
            "payment-success?doctype=Sales+Invoice&docname=SINV-0001"
        );
        assert_eq!(redirect.status, RequestStatus::Completed);
    }

    #[test]
    fn appends_encoded_redirect_target() {
        let redirect = SuccessRedirect::for_reference(&reference(), Some("/orders?id=7&tab=paid"));

        assert_eq!(
            redirect.redirect_to,
            "payment-success?doctype=Sales+Invoice&docname=SINV-0001&redirect_to=%2Forders%3Fid%3D7%26tab%3Dpaid"
        );
    }

    #[test]
    fn empty_redirect_target_is_ignored() {
        let redirect = SuccessRedirect::for_reference(&reference(), Some(""));
        assert!(!redirect.redirect_to.contains("redirect_to"));
    }

    #[test]
    fn reserved_characters_in_reference_stay_inside_their_parameter() {
        let reference = MerchantReference::new("Sales Invoice", "A&B=1").unwrap();
        let redirect = SuccessRedirect::for_reference(&reference, None);

        assert_eq!(
            redirect.redirect_to,
            "payment-success?doctype=Sales+Invoice&docname=A%26B%3D1"
        );
    }
}
