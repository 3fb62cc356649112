use std::env;
use chrono_tz::Tz;

/// Course location and the default pricing layout for newly built seasons.
#[derive(Clone, Debug)]
pub struct CourseSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    pub gap_min: i32,
    pub weekday_price: f64,
    pub weekend_price: f64,
    pub morning_discount: f64,
    pub afternoon_discount: f64,
    pub morning_slots: i32,
    pub afternoon_slots: i32,
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            latitude: 40.745152,
            longitude: -79.665367,
            timezone: chrono_tz::America::New_York,
            gap_min: 12,
            weekday_price: 60.0,
            weekend_price: 79.0,
            morning_discount: 10.0,
            afternoon_discount: 10.0,
            morning_slots: 8,
            afternoon_slots: 30,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub solar_api_url: String,
    pub course: CourseSettings,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Course clock from an IANA name such as `America/New_York`.
pub fn parse_timezone(raw: &str) -> Result<Tz, String> {
    raw.trim().parse::<Tz>().map_err(|_| format!("Unknown timezone '{}'", raw))
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = CourseSettings::default();
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            solar_api_url: env::var("SOLAR_API_URL").unwrap_or_else(|_| "https://api.sunrise-sunset.org/json".to_string()),
            course: CourseSettings {
                latitude: env_or("COURSE_LATITUDE", defaults.latitude),
                longitude: env_or("COURSE_LONGITUDE", defaults.longitude),
                timezone: env::var("COURSE_TIMEZONE")
                    .map(|raw| parse_timezone(&raw).expect("COURSE_TIMEZONE must be an IANA timezone name"))
                    .unwrap_or(defaults.timezone),
                gap_min: env_or("TEE_GAP_MIN", defaults.gap_min),
                weekday_price: env_or("WEEKDAY_PRICE", defaults.weekday_price),
                weekend_price: env_or("WEEKEND_PRICE", defaults.weekend_price),
                morning_discount: env_or("MORNING_DISCOUNT", defaults.morning_discount),
                afternoon_discount: env_or("AFTERNOON_DISCOUNT", defaults.afternoon_discount),
                morning_slots: env_or("MORNING_SLOTS", defaults.morning_slots),
                afternoon_slots: env_or("AFTERNOON_SLOTS", defaults.afternoon_slots),
            },
        }
    }
}
