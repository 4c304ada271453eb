use std::sync::Arc;

use tokio::time::Duration;

use bifocus::notification::{MockNotifier, Notifier, PermissionState};
use bifocus::persistence::{FileGateway, PersistenceGateway};
use bifocus::{Dashboard, DashboardConfig, SessionKind, Viewport, WidgetPosition, WorkspaceId};

async fn open_at(dir: &std::path::Path, config: &DashboardConfig) -> Dashboard {
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(FileGateway::new(dir));
    let notifier: Arc<dyn Notifier> = Arc::new(MockNotifier::new(PermissionState::Denied));
    Dashboard::with_parts(config, gateway, notifier)
        .await
        .unwrap()
}

async fn advance_secs(secs: u64) {
    for _ in 0..secs {
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn stats_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default();

    {
        let dashboard = open_at(dir.path(), &config).await;
        dashboard.start(SessionKind::EyeRest5).await.unwrap();
        advance_secs(300).await;
        dashboard.credit_task_completed().await;
        dashboard.shutdown().await;
    }

    let raw = std::fs::read_to_string(dir.path().join("stats-pro.json")).unwrap();
    assert_eq!(raw, r#"{"focusTime":0,"breaks":1,"tasksCompleted":1}"#);

    let dashboard = open_at(dir.path(), &config).await;
    let stats = dashboard.stats().stats;
    assert_eq!(stats.breaks_count, 1);
    assert_eq!(stats.tasks_completed, 1);
    assert!(dashboard.session().is_idle());
}

#[tokio::test(start_paused = true)]
async fn session_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default();

    {
        let dashboard = open_at(dir.path(), &config).await;
        dashboard.start(SessionKind::DeepWork50).await.unwrap();
        advance_secs(60).await;
        dashboard.shutdown().await;
    }

    let dashboard = open_at(dir.path(), &config).await;
    assert!(dashboard.session().is_idle());
    assert_eq!(dashboard.stats().stats.focus_minutes, 0);
}

#[tokio::test]
async fn workspaces_are_stored_separately() {
    let dir = tempfile::tempdir().unwrap();
    let perso = WorkspaceId::parse("perso").unwrap();
    let config = DashboardConfig::default().with_default_workspace(perso.clone());

    {
        let dashboard = open_at(dir.path(), &config).await;
        dashboard.credit_task_completed().await;
        dashboard.switch_workspace(WorkspaceId::default()).await;
        dashboard.credit_task_completed().await;
        dashboard.credit_task_completed().await;
        dashboard.flush().await;
    }

    let dashboard = open_at(dir.path(), &config).await;
    assert_eq!(dashboard.stats().workspace, perso);
    assert_eq!(dashboard.stats().stats.tasks_completed, 1);
    let pro = dashboard.switch_workspace(WorkspaceId::default()).await;
    assert_eq!(pro.stats.tasks_completed, 2);
}

#[tokio::test]
async fn widget_position_is_global_and_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default();

    {
        let dashboard = open_at(dir.path(), &config).await;
        assert_eq!(dashboard.widget().load().await, WidgetPosition::default());

        let saved = dashboard.widget().save(
            WidgetPosition {
                bottom: -50.0,
                right: 99999.0,
            },
            Viewport::new(1000.0, 800.0),
        );
        assert_eq!(saved.bottom, 0.0);
        assert_eq!(saved.right, 800.0);
        dashboard.flush().await;
    }

    let other = DashboardConfig::default()
        .with_default_workspace(WorkspaceId::parse("perso").unwrap());
    let dashboard = open_at(dir.path(), &other).await;
    let position = dashboard.widget().load().await;
    assert_eq!(position.bottom, 0.0);
    assert_eq!(position.right, 800.0);
}

#[tokio::test]
async fn open_uses_configured_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default().with_data_dir(dir.path());

    let dashboard = Dashboard::open(config).await.unwrap();
    dashboard.credit_task_completed().await;
    dashboard.flush().await;

    assert!(dir.path().join("stats-pro.json").exists());
}

#[tokio::test]
async fn open_rejects_invalid_config() {
    let config = DashboardConfig::default().with_tick_interval_ms(0);
    assert!(Dashboard::open(config).await.is_err());
}
