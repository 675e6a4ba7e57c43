// Shared constants (no magic values in use cases)

/// Prefix of the per-invocation working directory
pub const WORK_DIR_PREFIX: &str = "ansible-mistral-action";

/// Staged file names inside the working directory
pub const INVENTORY_FILE_NAME: &str = "inventory.yaml";
pub const PLAYBOOK_FILE_NAME: &str = "playbook.yaml";
pub const SSH_PRIVATE_KEY_FILE_NAME: &str = "ssh_private_key";

/// Owner read/write only
pub const SSH_PRIVATE_KEY_MODE: u32 = 0o600;

/// Verbosity used when the caller does not pass one
pub const DEFAULT_VERBOSITY: i64 = 5;

/// Highest verbosity rendered as a `-v` flag
pub const MAX_VERBOSITY: i64 = 5;

/// Default executables
pub const ANSIBLE_BIN: &str = "ansible";
pub const ANSIBLE_PLAYBOOK_BIN: &str = "ansible-playbook";

/// Object holding the plan's capabilities map
pub const CAPABILITIES_MAP_NAME: &str = "capabilities-map.yaml";

/// Container metadata header marking a container as a plan
pub const TRIPLEO_META_USAGE_KEY: &str = "x-container-meta-usage-tripleo";
pub const TRIPLEO_META_USAGE_PLAN: &str = "plan";

/// OpenStack credential variables injected on request
pub const OS_AUTH_URL: &str = "OS_AUTH_URL";
pub const OS_USERNAME: &str = "OS_USERNAME";
pub const OS_AUTH_TOKEN: &str = "OS_AUTH_TOKEN";
pub const OS_PROJECT_NAME: &str = "OS_PROJECT_NAME";
