use edgepanel_core::config::{DataSourceSettings, NetworkingConfig, NodeConfig};
use edgepanel_main::EdgePanel;

#[test]
fn test_start_and_terminate_without_database() {
    let conf = NodeConfig {
        name: "test".into(),
        networking: NetworkingConfig {
            port: 0,
            bind: None,
        },
        datasource: DataSourceSettings {
            host: Some("127.0.0.1".into()),
            port: Some(1),
            ..Default::default()
        },
        ..Default::default()
    };

    let instance = EdgePanel::start(conf).unwrap();
    let subsystems = instance.subsystems().unwrap();

    assert!(subsystems.http().healthy());
    assert!(!subsystems.health().is_healthy().unwrap());
    assert_eq!(instance.conf().name, "test");

    instance.terminate().unwrap();
}
