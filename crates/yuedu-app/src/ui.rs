use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::RwLock;
use yuedu_config::Config;
use yuedu_types::AppEvent;

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    yuedu_ui::ui_loop(app_to_ui_rx, ui_to_app_tx, config).await
}
