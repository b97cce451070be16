use abi::Config;

use crate::HotelService;

pub struct TestConfig {
    pub config: Config,
}

impl Default for TestConfig {
    fn default() -> Self {
        let mut config = Config::load("fixtures/config.yml").unwrap();
        // nothing listens here, requests that reach the pool fail fast
        config.db.port = 1;
        Self { config }
    }
}

impl TestConfig {
    pub fn service(&self) -> HotelService {
        HotelService::lazy(&self.config).unwrap()
    }
}
