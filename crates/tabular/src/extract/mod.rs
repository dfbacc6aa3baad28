//! One extractor per tool listing.

pub mod dhcp;
pub mod directory;
pub mod dns;
pub mod svn;

pub use dhcp::{FilterExtractor, FilterMode, LeaseExtractor, ScopeExtractor};
pub use directory::{decode_sid, users_from_entries, DirectoryEntry};
pub use dns::{DnsRecordExtractor, OwnerName, RECORD_TYPE_A};
pub use svn::{
    item_id, FolderExtractor, PermissionExtractor, RepositoryExtractor, UserPermissionExtractor,
    ROOT_PATH,
};
