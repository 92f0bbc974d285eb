use thiserror::Error;

/// Failure taxonomy for gateway calls.
///
/// Connectivity failures and application-level errors must never be
/// conflated in user messaging: an unreachable endpoint points at the
/// configured URL, not at credentials or data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The endpoint could not be reached or answered with something
    /// that is not JSON.
    #[error("không gọi được endpoint dữ liệu: {0}")]
    Network(String),
    /// The endpoint answered and reported a failure of its own
    /// (invalid credentials, unknown action, duplicate user, missing
    /// sheet, ...).
    #[error("{0}")]
    Application(String),
}

impl GatewayError {
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }

    /// Message shown to the user. Network problems get an actionable
    /// hint about the endpoint configuration; application errors are
    /// surfaced literally.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(_) => {
                "Lỗi kết nối: không thể gọi đến endpoint dữ liệu. \
                 Vui lòng kiểm tra đường dẫn URL trong phần Cài đặt."
                    .to_string()
            }
            GatewayError::Application(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message_points_at_configuration() {
        let err = GatewayError::Network("timeout".into());
        assert!(err.is_network());
        assert!(err.user_message().contains("endpoint"));
    }

    #[test]
    fn application_message_is_surfaced_literally() {
        let err = GatewayError::Application("Sai mật khẩu".into());
        assert_eq!(err.user_message(), "Sai mật khẩu");
    }
}
