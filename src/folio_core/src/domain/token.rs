use serde::{Deserialize, Serialize};

/// The two independently-keyed token classes issued by the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Purpose of a single-use verification token. A token is only redeemable
/// for the purpose it was issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenPurpose {
    VerifyEmail,
    ChangeEmail,
    ResetPassword,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::VerifyEmail => "VERIFY_EMAIL",
            TokenPurpose::ChangeEmail => "CHANGE_EMAIL",
            TokenPurpose::ResetPassword => "RESET_PASSWORD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "VERIFY_EMAIL" => Some(TokenPurpose::VerifyEmail),
            "CHANGE_EMAIL" => Some(TokenPurpose::ChangeEmail),
            "RESET_PASSWORD" => Some(TokenPurpose::ResetPassword),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
