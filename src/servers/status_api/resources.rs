use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Info {
    pub app: String,
    pub registration: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Health {
    #[serde(rename = "UP")]
    Up,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub status: Health,
}

impl Report {
    #[must_use]
    pub fn up() -> Self {
        Self { status: Health::Up }
    }
}
