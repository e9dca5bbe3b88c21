pub mod crawl_response;
