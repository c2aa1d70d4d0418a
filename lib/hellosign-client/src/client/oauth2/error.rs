/// Failure to set up or run the client-credentials token exchange.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum OAuth2Error {
    /// The token URL could not be parsed.
    #[display("Invalid token endpoint URL '{url}': {reason}")]
    InvalidTokenEndpoint {
        /// URL as given to the builder.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The token endpoint was unreachable or refused the client credentials.
    #[display("Token acquisition failed: {reason}")]
    TokenAcquisitionFailed {
        /// Message from the token exchange.
        reason: String,
    },

    /// Client id or secret is unusable.
    #[display("OAuth2 configuration error: {reason}")]
    ConfigurationError {
        /// What is wrong with the credentials.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_refused_credentials() {
        let error = OAuth2Error::TokenAcquisitionFailed {
            reason: "invalid_client".to_string(),
        };

        insta::assert_snapshot!(error, @"Token acquisition failed: invalid_client");
    }

    #[test]
    fn should_show_offending_token_url() {
        let error = OAuth2Error::InvalidTokenEndpoint {
            url: "api.hellosign.com/oauth/token".to_string(),
            reason: "relative URL without a base".to_string(),
        };

        insta::assert_snapshot!(error, @"Invalid token endpoint URL 'api.hellosign.com/oauth/token': relative URL without a base");
    }
}
