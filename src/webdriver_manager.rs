use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::webdriver::BrowserType;

/// Starts and stops the WebDriver executables (geckodriver, chromedriver)
#[derive(Default)]
pub struct WebDriverManager {
    processes: Mutex<Vec<DriverProcess>>,
}

struct DriverProcess {
    browser_type: BrowserType,
    child: Child,
    port: u16,
    url: String,
}

impl WebDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn processes(&self) -> MutexGuard<'_, Vec<DriverProcess>> {
        self.processes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the URL of a ready WebDriver for `browser_type`, starting one if needed
    pub async fn ensure_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let managed: Vec<String> = self
            .processes()
            .iter()
            .filter(|p| p.browser_type == *browser_type)
            .map(|p| p.url.clone())
            .collect();

        for url in managed {
            if Self::verify_driver_working(&url).await {
                debug!("Using managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        let external = Self::standard_url(browser_type);
        if Self::verify_driver_working(&external).await {
            debug!("Found external WebDriver at {}", external);
            return Ok(external);
        }

        info!("WebDriver not detected, starting {}", browser_type.driver_name());
        self.start_driver(browser_type).await
    }

    /// URL an externally started driver listens on by default
    pub fn standard_url(browser_type: &BrowserType) -> String {
        match browser_type {
            BrowserType::Firefox => "http://localhost:4444".to_string(),
            BrowserType::Chrome => "http://localhost:9515".to_string(),
        }
    }

    async fn start_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Please install it:\n\
                  macOS: brew install {}\n\
                  Linux: Download from official releases\n\
                  Or see: https://www.selenium.dev/documentation/webdriver/getting_started/install_drivers/",
                command,
                command
            );
        }

        let port = Self::find_free_port_for_browser(browser_type)?;
        let args = match browser_type {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        };
        info!("Starting {} on port {}", command, port);

        let mut cmd = Command::new(command);
        cmd.args(&args).stdout(Stdio::null()).stderr(Stdio::null());

        // Own process group so the browser children die with the driver
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to start {}", command))?;
        let url = format!("http://localhost:{}", port);

        self.processes().push(DriverProcess {
            browser_type: *browser_type,
            child,
            port,
            url: url.clone(),
        });

        // 3 seconds total
        for _ in 0..30 {
            if Self::is_driver_running(&url).await {
                info!("WebDriver started successfully on port {}", port);
                return Ok(url);
            }
            sleep(Duration::from_millis(100)).await;
        }

        self.remove_where(|p| p.port == port);
        anyhow::bail!("WebDriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        let finder = "which";
        #[cfg(windows)]
        let finder = "where";

        Command::new(finder)
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Find a free port, preferring the driver's usual ones
    pub fn find_free_port_for_browser(browser_type: &BrowserType) -> Result<u16> {
        let preferred = match browser_type {
            BrowserType::Firefox => [4444, 4445, 4446],
            BrowserType::Chrome => [9515, 9516, 9517],
        };

        if let Some(port) = preferred.into_iter().find(|p| !Self::is_port_in_use(*p)) {
            debug!("Found free port {} for {:?}", port, browser_type);
            return Ok(port);
        }

        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        Ok(listener.local_addr()?.port())
    }

    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check if something answers on the WebDriver status endpoint
    pub async fn is_driver_running(url: &str) -> bool {
        Self::status(url).await.is_some()
    }

    /// Check that the driver reports `ready: true`
    async fn verify_driver_working(url: &str) -> bool {
        Self::status(url)
            .await
            .and_then(|body| body.get("value")?.get("ready")?.as_bool())
            .unwrap_or(false)
    }

    async fn status(url: &str) -> Option<serde_json::Value> {
        let response = reqwest::Client::new()
            .get(format!("{}/status", url))
            .timeout(Duration::from_secs(1))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<serde_json::Value>().await.ok()
    }

    /// Kill the managed driver for a browser type
    pub fn kill_driver(&self, browser_type: &BrowserType) {
        self.remove_where(|p| p.browser_type == *browser_type);
    }

    fn remove_where(&self, predicate: impl Fn(&DriverProcess) -> bool) {
        let mut processes = self.processes();
        let mut index = 0;
        while index < processes.len() {
            if predicate(&processes[index]) {
                let process = processes.remove(index);
                Self::terminate(process);
            } else {
                index += 1;
            }
        }
    }

    fn terminate(mut process: DriverProcess) {
        debug!("Stopping WebDriver on port {}", process.port);

        #[cfg(unix)]
        Self::kill_process_group(process.child.id() as i32);

        let _ = process.child.kill();
        let _ = process.child.wait();
    }

    /// SIGTERM then SIGKILL the whole group
    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        for signal in ["-TERM", "-KILL"] {
            if let Err(e) = Command::new("kill")
                .args([signal, &format!("-{}", pgid)])
                .output()
            {
                debug!("Failed to signal process group {}: {}", pgid, e);
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        self.remove_where(|_| true);
    }

    pub fn managed_count(&self) -> usize {
        self.processes().len()
    }
}

impl Drop for WebDriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

lazy_static::lazy_static! {
    pub static ref GLOBAL_WEBDRIVER_MANAGER: WebDriverManager = WebDriverManager::new();
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
