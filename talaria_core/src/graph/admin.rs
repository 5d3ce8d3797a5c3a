use serde::{Deserialize, Serialize};

/// Administrative region descriptor (country and state).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Admin {
    pub country_code: String,
    pub country_text: String,
    pub state_code: String,
    pub state_text: String,
}

impl Admin {
    pub fn new(
        country_code: impl Into<String>,
        country_text: impl Into<String>,
        state_code: impl Into<String>,
        state_text: impl Into<String>,
    ) -> Admin {
        Admin {
            country_code: country_code.into(),
            country_text: country_text.into(),
            state_code: state_code.into(),
            state_text: state_text.into(),
        }
    }
}
