pub mod paths;
pub mod profile;

pub use paths::DataDir;
pub use profile::UserProfile;
