//! Paymob Accept API endpoints.

/// Production API root.
pub const DEFAULT_API_BASE_URL: &str = "https://accept.paymob.com/api";

/// Gateway endpoints used by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    Order,
    PaymentKey,
    Iframes,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Auth => "/auth/tokens",
            Endpoint::Order => "/ecommerce/orders",
            Endpoint::PaymentKey => "/acceptance/payment_keys",
            Endpoint::Iframes => "/acceptance/iframes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Auth => "auth",
            Endpoint::Order => "order",
            Endpoint::PaymentKey => "payment_key",
            Endpoint::Iframes => "iframes",
        }
    }
}

/// Resolves endpoints against an API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymobUrls {
    base_url: String,
}

impl PaymobUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Base of the hosted payment iframe URL.
    pub fn iframe_base_url(&self) -> String {
        self.get_url(Endpoint::Iframes)
    }
}

impl Default for PaymobUrls {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
