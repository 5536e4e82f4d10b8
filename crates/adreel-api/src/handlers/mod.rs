pub mod ad_accounts;
pub mod health;
pub mod media_link;
pub mod media_list;
pub mod media_upload;
