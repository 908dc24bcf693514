use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjmapError>;

#[derive(Error, Debug)]
pub enum ProjmapError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Git error for '{path}': {message}")]
    ExternalTool { path: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid ignore pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object find error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for ProjmapError {
    fn from(err: gix::discover::Error) -> Self {
        ProjmapError::GitDiscover(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for ProjmapError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        ProjmapError::HeadPeel(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for ProjmapError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        ProjmapError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for ProjmapError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        ProjmapError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for ProjmapError {
    fn from(err: gix::object::commit::Error) -> Self {
        ProjmapError::Commit(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for ProjmapError {
    fn from(err: gix::objs::decode::Error) -> Self {
        ProjmapError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for ProjmapError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        ProjmapError::DiffTreeToTree(Box::new(err))
    }
}
