use gacha::RecordCollector;
use std::sync::Arc;

/// Remote collector from the game log, or the fixture mock when
/// `GACHA_EXAMPLES_USE_MOCK` is set.
pub async fn get_collector() -> Result<Arc<dyn RecordCollector>, gacha::GachaError> {
    if std::env::var("GACHA_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Collector for CI) ---");
        Ok(Arc::new(gacha_mock::MockCollector::new()))
    } else {
        Ok(Arc::new(gacha_remote::RemoteCollector::builder().build().await?))
    }
}
