pub mod scrape;
pub mod storage;
