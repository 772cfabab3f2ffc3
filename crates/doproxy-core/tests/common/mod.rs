use async_trait::async_trait;
use doproxy_cloud::{
    Action, ActionId, ActionStatus, CloudError, CreateDroplet, Droplet, DropletId, DropletStatus,
    Image, InstanceProvider, PollConfig, Result as CloudResult,
};
use doproxy_config::{Config, DropletOptions, PollingOptions};
use doproxy_core::{FleetError, FleetManager, Reloader, Result};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const TEMPLATE: &str = "backend www\n{% for b in backends %}    server {{ b.name }} {{ b.private_ip }}:80 check\n{% endfor %}";

pub type Events = Arc<Mutex<Vec<String>>>;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("haproxy.cfg.tera"), TEMPLATE).unwrap();
        fs::write(root.path().join("user-data.yml"), "#cloud-config\n").unwrap();
        fs::write(root.path().join("inventory"), "").unwrap();
        fs::create_dir_all(root.path().join("deploy")).unwrap();
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn write_inventory(&self, content: &str) {
        fs::write(self.path().join("inventory"), content).unwrap();
    }

    pub fn inventory(&self) -> String {
        fs::read_to_string(self.path().join("inventory")).unwrap()
    }

    #[allow(dead_code)]
    pub fn rendered(&self) -> Option<String> {
        fs::read_to_string(self.path().join("haproxy.cfg")).ok()
    }

    #[allow(dead_code)]
    pub fn deployed(&self) -> Option<String> {
        fs::read_to_string(self.path().join("deploy").join("haproxy.cfg")).ok()
    }

    pub fn config(&self) -> Config {
        let root = self.path();
        Config {
            token: "test-token".to_string(),
            ssh_key_ids: vec![],
            inventory_file: root.join("inventory"),
            userdata_file: root.join("user-data.yml"),
            haproxy_template_file: root.join("haproxy.cfg.tera"),
            haproxy_cfg_file: root.join("haproxy.cfg"),
            haproxy_cfg_path: root.join("deploy"),
            droplet_options: DropletOptions {
                hostname_prefix: "web".to_string(),
                region: "nyc3".to_string(),
                size: "s-1vcpu-1gb".to_string(),
                image: "ubuntu-24-04-x64".to_string(),
                master: Some("web-master".to_string()),
                clone_image: Some("web-clone".to_string()),
                snapshot_overwrite: false,
            },
            reload_command: vec!["true".to_string()],
            api_url: None,
            polling: PollingOptions::default(),
            hostname_counter_file: None,
        }
    }
}

pub fn droplet(id: DropletId, name: &str) -> Droplet {
    Droplet {
        id,
        name: name.to_string(),
        status: DropletStatus::Active,
        private_ip: Some(format!("10.0.0.{}", id)),
        public_ip: None,
    }
}

pub const SHUTDOWN_ACTION: ActionId = 1;
pub const SNAPSHOT_ACTION: ActionId = 2;
pub const POWER_ON_ACTION: ActionId = 3;

fn action(id: ActionId, kind: &str, status: ActionStatus) -> Action {
    Action {
        id,
        kind: kind.to_string(),
        status,
    }
}

/// In-memory provider that records every call
pub struct MockProvider {
    droplets: Mutex<BTreeMap<DropletId, Droplet>>,
    images: Mutex<Vec<Image>>,
    create_status: Mutex<DropletStatus>,
    find_script: Mutex<VecDeque<DropletStatus>>,
    next_id: AtomicU64,
    pub events: Events,
    pub fail_delete: AtomicBool,
    pub snapshot_unprocessable: AtomicBool,
    pub shutdown_unprocessable: AtomicBool,
    /// `snapshot` succeeds without producing an image
    pub snapshot_without_image: AtomicBool,
    failed_action: Mutex<Option<ActionId>>,
}

impl MockProvider {
    pub fn new(droplets: Vec<Droplet>) -> Self {
        Self {
            droplets: Mutex::new(droplets.into_iter().map(|d| (d.id, d)).collect()),
            images: Mutex::new(vec![]),
            create_status: Mutex::new(DropletStatus::New),
            find_script: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(100),
            events: Arc::new(Mutex::new(vec![])),
            fail_delete: AtomicBool::new(false),
            snapshot_unprocessable: AtomicBool::new(false),
            shutdown_unprocessable: AtomicBool::new(false),
            snapshot_without_image: AtomicBool::new(false),
            failed_action: Mutex::new(None),
        }
    }

    /// Statuses returned by successive `find` calls for the next created droplet
    pub fn script_finds(&self, statuses: Vec<DropletStatus>) {
        *self.find_script.lock().unwrap() = statuses.into();
    }

    #[allow(dead_code)]
    pub fn set_create_status(&self, status: DropletStatus) {
        *self.create_status.lock().unwrap() = status;
    }

    /// Make `find_action` report action `id` as errored
    #[allow(dead_code)]
    pub fn fail_action(&self, id: ActionId) {
        *self.failed_action.lock().unwrap() = Some(id);
    }

    #[allow(dead_code)]
    pub fn add_image(&self, image: Image) {
        self.images.lock().unwrap().push(image);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    /// Calls that change anything at the provider
    #[allow(dead_code)]
    pub fn mutations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| {
                ["create:", "delete:", "shutdown:", "snapshot:", "power_on:"]
                    .iter()
                    .any(|p| e.starts_with(p))
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn is_alive(&self, id: DropletId) -> bool {
        self.droplets.lock().unwrap().contains_key(&id)
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl InstanceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn find(&self, id: DropletId) -> CloudResult<Option<Droplet>> {
        self.record(format!("find:{}", id));

        let mut droplets = self.droplets.lock().unwrap();
        let Some(droplet) = droplets.get_mut(&id) else {
            return Ok(None);
        };
        if droplet.status != DropletStatus::Active {
            let next = self
                .find_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(DropletStatus::Active);
            droplet.status = next;
        }
        Ok(Some(droplet.clone()))
    }

    async fn create(&self, request: &CreateDroplet) -> CloudResult<Droplet> {
        self.record(format!("create:{}:{}", request.name, request.image));

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let droplet = Droplet {
            id,
            name: request.name.clone(),
            status: self.create_status.lock().unwrap().clone(),
            private_ip: Some(format!("10.0.1.{}", id)),
            public_ip: None,
        };
        self.droplets.lock().unwrap().insert(id, droplet.clone());
        Ok(droplet)
    }

    async fn delete(&self, id: DropletId) -> CloudResult<()> {
        self.record(format!("delete:{}", id));

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(CloudError::Api {
                status: 500,
                id: "server_error".to_string(),
                message: "Server was unable to give you a response.".to_string(),
            });
        }
        self.droplets.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list_all(&self) -> CloudResult<Vec<Droplet>> {
        self.record("list_all".to_string());
        Ok(self.droplets.lock().unwrap().values().cloned().collect())
    }

    async fn list_private_images(&self) -> CloudResult<Vec<Image>> {
        self.record("list_private_images".to_string());
        Ok(self.images.lock().unwrap().clone())
    }

    async fn shutdown(&self, id: DropletId) -> CloudResult<Action> {
        self.record(format!("shutdown:{}", id));

        if self.shutdown_unprocessable.load(Ordering::SeqCst) {
            return Err(CloudError::Unprocessable(
                "Droplet is already powered off.".to_string(),
            ));
        }
        Ok(action(SHUTDOWN_ACTION, "shutdown", ActionStatus::Pending))
    }

    async fn snapshot(&self, id: DropletId, name: &str) -> CloudResult<Action> {
        self.record(format!("snapshot:{}:{}", id, name));

        if self.snapshot_unprocessable.load(Ordering::SeqCst) {
            return Err(CloudError::Unprocessable(
                "Droplet is currently on. Please power it off to run this event.".to_string(),
            ));
        }

        if !self.snapshot_without_image.load(Ordering::SeqCst) {
            let mut images = self.images.lock().unwrap();
            let image_id = 9000 + images.len() as u64;
            images.push(Image {
                id: image_id,
                name: name.to_string(),
            });
        }
        Ok(action(SNAPSHOT_ACTION, "snapshot", ActionStatus::Pending))
    }

    async fn power_on(&self, id: DropletId) -> CloudResult<Action> {
        self.record(format!("power_on:{}", id));
        Ok(action(POWER_ON_ACTION, "power_on", ActionStatus::Pending))
    }

    async fn find_action(&self, id: ActionId) -> CloudResult<Action> {
        self.record(format!("find_action:{}", id));

        if *self.failed_action.lock().unwrap() == Some(id) {
            return Ok(action(id, "action", ActionStatus::Failed("errored".to_string())));
        }
        Ok(action(id, "action", ActionStatus::Completed))
    }
}

/// Reloader that records into the provider's event log
pub struct RecordingReloader {
    events: Events,
}

impl RecordingReloader {
    pub fn new(events: Events) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Reloader for RecordingReloader {
    async fn reload(&self) -> Result<()> {
        self.events.lock().unwrap().push("reload".to_string());
        Ok(())
    }
}

/// Reloader whose command cannot be started
pub struct FailingReloader;

#[async_trait]
impl Reloader for FailingReloader {
    async fn reload(&self) -> Result<()> {
        Err(FleetError::Io {
            path: PathBuf::from("service"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "service: not found"),
        })
    }
}

pub fn fast_poll() -> PollConfig {
    PollConfig::new(Duration::ZERO, Some(20))
}

pub async fn open_manager(project: &TestProject, provider: &Arc<MockProvider>) -> Result<FleetManager> {
    let reloader = Arc::new(RecordingReloader::new(provider.events.clone()));
    open_manager_with(project.config(), provider, reloader).await
}

pub async fn open_manager_with(
    config: Config,
    provider: &Arc<MockProvider>,
    reloader: Arc<dyn Reloader>,
) -> Result<FleetManager> {
    let manager = FleetManager::open(Arc::new(config), provider.clone(), reloader).await?;
    Ok(manager.with_polling(fast_poll(), fast_poll()))
}
