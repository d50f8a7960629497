//! Built-in widget providers.
//!
//! Each widget registers one provider under its registry id. Registration
//! is explicit: a registry entry whose id has no provider here loads its
//! assets but is reported as an error.

pub mod clock;
pub mod network;
pub mod weather;

use std::sync::Arc;

use dashboard::widget::ProviderRegistry;

use self::weather::{WeatherProvider, WeatherSource};

/// Register every built-in widget.
pub fn register_builtin(providers: &mut ProviderRegistry, weather_source: Arc<dyn WeatherSource>) {
    providers.register(clock::WIDGET_ID, clock::content);
    providers.register(weather::WIDGET_ID, WeatherProvider::new(weather_source));
    network::register(providers);
}
