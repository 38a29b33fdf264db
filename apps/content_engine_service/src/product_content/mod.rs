pub mod product_content_controller;
pub mod product_content_parser;
pub mod product_content_prompt;
pub mod product_content_schema;
pub mod product_content_service;
