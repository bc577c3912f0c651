//! Client-side orchestration for the PixelType font-size analysis service.

pub mod config;
pub mod events;
pub mod intake;
pub mod orchestrator;
pub mod progress;
pub mod projector;
pub mod session;
pub mod transport;
pub mod view;

pub use config::{load_settings, ClientSettings};
pub use events::SessionEvent;
pub use intake::{FileCandidate, FileIntake, SelectedFile};
pub use orchestrator::{RequestOrchestrator, SubmitOutcome};
pub use progress::{Checkpoint, ProcessingState};
pub use projector::{project, rank_distribution, DisplayStat, Distribution, RankedBucket};
pub use session::{AnalysisResult, ResolvedImages, Session};
pub use transport::{AcceptedHook, AnalysisService, HttpAnalysisService};
pub use view::{UserMessage, ViewController, ViewIndicator};
