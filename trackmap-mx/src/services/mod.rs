//! External collaborators: video search, AI judge, catalog source

pub mod ai_judge;
pub mod catalog;
pub mod ollama_judge;
pub mod spotify_client;
pub mod video_search;
pub mod youtube_client;

pub use ai_judge::{AiJudge, JudgeError, Verdict};
pub use catalog::{CatalogAccess, CatalogError, CatalogSelector, CatalogSource};
pub use ollama_judge::{JudgeSettings, OllamaJudge};
pub use spotify_client::SpotifyCatalog;
pub use video_search::{SearchError, SearchHit, VideoDetails, VideoSearch};
pub use youtube_client::YouTubeClient;
