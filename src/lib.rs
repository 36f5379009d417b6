//! Library crate for smb-auth-sweep: the attempt executor, the sweep loop and the
//! SMB collaborators they drive.
pub mod attempt;
pub mod mock_session;
pub mod report;
pub mod session;
pub mod smbclient;
pub mod sweep;
pub mod types;
pub mod wordlist;
