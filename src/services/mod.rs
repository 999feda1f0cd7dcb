pub mod test_service;
