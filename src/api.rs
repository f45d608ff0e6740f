use std::time::Duration;
use reqwest::Url;
use crate::errors::FetchError;
use crate::model::{ForecastDay, Lesson, ScheduleResponse, WeatherResponse};

pub const SCHEDULE_PATH: &str = "/api/schedule";
pub const WEATHER_PATH: &str = "/api/weather";

/// The two calls the front end makes against the schedule site.
pub trait Backend {
    fn fetch_schedule(&self, group: &str) -> Result<Vec<Vec<Lesson>>, FetchError>;
    fn fetch_weather(&self) -> Result<Vec<ForecastDay>, FetchError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_builder(reqwest::blocking::Client::builder().timeout(timeout), base_url)
    }

    fn with_builder(builder: reqwest::blocking::ClientBuilder, base_url: &str) -> Result<Self, FetchError> {
        let client = builder.build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn schedule_url(&self, group: &str) -> Result<Url, FetchError> {
        schedule_url(&self.base_url, group)
    }
}

// 课表地址，group 参数会被 URL 转义
pub fn schedule_url(base_url: &str, group: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(&format!("{}{}", base_url, SCHEDULE_PATH))
        .map_err(|e| FetchError::Transport(format!("invalid url: {e}")))?;
    url.query_pairs_mut().append_pair("group", group);
    Ok(url)
}

pub fn weather_url(base_url: &str) -> Result<Url, FetchError> {
    Url::parse(&format!("{}{}", base_url, WEATHER_PATH))
        .map_err(|e| FetchError::Transport(format!("invalid url: {e}")))
}

impl Backend for HttpBackend {
    fn fetch_schedule(&self, group: &str) -> Result<Vec<Vec<Lesson>>, FetchError> {
        let url = self.schedule_url(group)?;
        log::info!("GET {url}");
        let resp = self.client.get(url).send().and_then(|r| r.error_for_status())?;
        let body = resp.json::<ScheduleResponse>()?;
        interpret_schedule(body)
    }

    fn fetch_weather(&self) -> Result<Vec<ForecastDay>, FetchError> {
        let url = weather_url(&self.base_url)?;
        log::info!("GET {url}");
        let resp = self.client.get(url).send().and_then(|r| r.error_for_status())?;
        let body = resp.json::<WeatherResponse>()?;
        interpret_weather(body)
    }
}

/// `success:true` with a schedule object yields its weeks (possibly none);
/// anything else is an application-level rejection.
pub fn interpret_schedule(resp: ScheduleResponse) -> Result<Vec<Vec<Lesson>>, FetchError> {
    match resp.schedule {
        Some(body) if resp.success => Ok(body.weeks),
        _ => Err(FetchError::Rejected(resp.message)),
    }
}

pub fn interpret_weather(resp: WeatherResponse) -> Result<Vec<ForecastDay>, FetchError> {
    match resp.forecast {
        Some(days) if resp.success => Ok(days),
        _ => Err(FetchError::Rejected(resp.message)),
    }
}
