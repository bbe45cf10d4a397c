use super::*;

/// The custom errors the registry can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// The token ID is already registered (Error code: -4).
    AlreadyExists,
    /// The token ID was never minted (Error code: -5).
    TokenNotFound,
    /// Sender is neither the owner of the token nor approved for it
    /// (Error code: -6).
    NotOwner,
    /// Sender is not the approved address of the token (Error code: -7).
    NotApproved,
    /// Receiver already owns the token (Error code: -8).
    SelfTransfer,
    /// Owner is not allowed to approve themself (Error code: -9).
    SelfApproval,
    /// Sender lacks the rights required by the mint policy or the authority
    /// lists (Error code: -10).
    Unauthorized,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}
