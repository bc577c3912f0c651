use serde::{Deserialize, Serialize};

macro_rules! counter_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            pub fn next(self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }
    };
}

// Identifies one submission; scheduled updates carry the epoch they were issued under.
counter_newtype!(Epoch);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Normalized,
    OcrDetection,
    Overlay,
    Annotated,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Normalized,
        ViewKind::OcrDetection,
        ViewKind::Overlay,
        ViewKind::Annotated,
    ];

    /// Stable identifier shared by the tab and its content element.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Normalized => "normalized",
            ViewKind::OcrDetection => "ocr_detection",
            ViewKind::Overlay => "overlay",
            ViewKind::Annotated => "annotated",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Normalized => "Normalized",
            ViewKind::OcrDetection => "OCR detection",
            ViewKind::Overlay => "Overlay",
            ViewKind::Annotated => "Annotated",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|view| {
            view.as_str() == raw || (raw == "ocr" && *view == ViewKind::OcrDetection)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Success,
    Error,
}
