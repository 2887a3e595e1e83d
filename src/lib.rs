pub mod catalog;
pub mod directory;
pub mod dump;
pub mod engine;
pub mod export;
pub mod filter;
pub mod principal;
pub mod report;
pub mod resolver;

pub mod prelude {
    pub use crate::directory::{Directory, DirectoryError, InMemoryDirectory};
    pub use crate::filter::MemberFilter;
    pub use crate::principal::{GroupName, Principal, PrincipalName};
    pub use crate::resolver::resolve_members;
}
