pub mod http_solar_service;
