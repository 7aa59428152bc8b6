pub mod content;

pub use content::{
    Content, ContentKind, ContentLinks, Episode, ManualLink, QualityLink, SeasonPack,
};
