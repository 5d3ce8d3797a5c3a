use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignType {
    ExitNumber,
    ExitBranch,
    ExitToward,
    ExitName,
    GuideBranch,
    GuideToward,
    GuidanceViewJunction,
    JunctionName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sign {
    pub sign_type: SignType,
    pub text: String,
    pub is_route_number: bool,
}

impl Sign {
    pub fn new(sign_type: SignType, text: impl Into<String>, is_route_number: bool) -> Sign {
        Sign {
            sign_type,
            text: text.into(),
            is_route_number,
        }
    }
}
