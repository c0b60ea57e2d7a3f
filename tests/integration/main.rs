mod crawl_tests;
mod pipeline_tests;
