use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Publication status of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Ongoing,
    Completed,
    Cancelled,
}
impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ongoing => "Ongoing",
            Status::Completed => "Completed",
            Status::Cancelled => "Cancelled",
        }
    }
}
impl TryFrom<String> for Status {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl FromStr for Status {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        Ok(match sanitized.as_str() {
            "ongoing" | "publishing" | "updating" | "inprogress" => Self::Ongoing,
            "completed" | "complete" | "finished" | "ended" => Self::Completed,
            "cancelled" | "canceled" | "dropped" | "discontinued" => Self::Cancelled,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "status",
                value: format!("unknown status: {}", s)
            }),
        })
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
