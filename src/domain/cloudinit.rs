//! First-boot provisioning payload.
//!
//! [`render_bootstrap_script`] turns a [`MachineSpec`] into the shell script
//! cloud-init runs on a fresh server. [`BootstrapConfig`] wraps that script in
//! the single-part `multipart/mixed` envelope the cloud-init agent expects as
//! instance user data (plain text, no gzip, no base64).

use crate::domain::machine::MachineSpec;

/// Pinned k9s release installed on every machine.
pub const K9S_VERSION: &str = "v0.25.18";
/// Pinned kubectx release installed on every machine.
pub const KUBECTX_VERSION: &str = "v0.9.3";

/// Boundary string separating MIME parts in the rendered user data.
pub const MIME_BOUNDARY: &str = "MIMEBOUNDARY";
/// MIME content type that makes cloud-init execute the part as a script.
pub const SCRIPT_CONTENT_TYPE: &str = "text/x-shellscript";
/// Filename recorded in the part header.
pub const SCRIPT_FILENAME: &str = "initialize.sh";

/// Renders the first-boot script for one machine: admin account creation,
/// Docker and the Kubernetes CLI toolchain, inotify limits, and a scoped
/// passwordless-sudo drop-in for the new user.
///
/// Credentials are interpolated verbatim. The fleet validators are the guard
/// against values that would break out of the unquoted `do_user` call; this
/// function never rejects input.
#[must_use]
pub fn render_bootstrap_script(spec: &MachineSpec) -> String {
    format!(
        r#"#!/bin/bash

function do_user() {{
    adduser --gecos "" --disabled-password $1
    chpasswd <<<"$1:$2"
    adduser $1 sudo
}}

do_user {user} {password}

export DEBIAN_FRONTEND=noninteractive
apt-get -y update
apt-get -y install apt-transport-https ca-certificates curl vim wget joe gnupg lsb-release git jq tmux python3-pip

curl -fsSL https://download.docker.com/linux/ubuntu/gpg | gpg --dearmor -o /usr/share/keyrings/docker-archive-keyring.gpg
echo "deb [arch=amd64 signed-by=/usr/share/keyrings/docker-archive-keyring.gpg] https://download.docker.com/linux/ubuntu \
    $(lsb_release -cs) stable" | tee /etc/apt/sources.list.d/docker.list > /dev/null
apt-get -y update && apt-get -y install docker-ce docker-ce-cli containerd.io

curl -LO "https://dl.k8s.io/release/$(curl -L -s https://dl.k8s.io/release/stable.txt)/bin/linux/amd64/kubectl" && \
install kubectl /usr/local/bin

curl https://raw.githubusercontent.com/helm/helm/master/scripts/get-helm-3 | bash

curl -Lo skaffold https://storage.googleapis.com/skaffold/releases/latest/skaffold-linux-amd64 && \
install skaffold /usr/local/bin/

curl -Lo k9s.tgz https://github.com/derailed/k9s/releases/download/{k9s_version}/k9s_Linux_x86_64.tar.gz && \
tar -xf k9s.tgz && install k9s /usr/local/bin/

curl -Lo kubectx https://github.com/ahmetb/kubectx/releases/download/{kubectx_version}/kubectx && \
install kubectx /usr/local/bin/

echo >> /etc/sysctl.conf
echo "fs.inotify.max_user_watches=1048576" >> /etc/sysctl.conf
echo "fs.inotify.max_user_instances=1000000" >> /etc/sysctl.conf

sysctl --system

echo "{user} ALL=(ALL:ALL) NOPASSWD:ALL" > /etc/sudoers.d/90-{user}
chmod 440 /etc/sudoers.d/90-{user}

adduser {user} docker
"#,
        user = spec.user_name,
        password = spec.password.expose(),
        k9s_version = K9S_VERSION,
        kubectx_version = KUBECTX_VERSION,
    )
}

// ── Bootstrap config ──────────────────────────────────────────────────────────

/// A machine's rendered script plus the artifact name it is submitted under.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Artifact name, `config-<machine>`.
    pub name: String,
    /// The raw shell script, before MIME framing.
    pub script: String,
}

impl BootstrapConfig {
    /// Wraps a rendered script under the machine's derived artifact name.
    #[must_use]
    pub fn build(machine_name: &str, script: String) -> Self {
        Self {
            name: format!("config-{machine_name}"),
            script,
        }
    }

    /// Renders the user-data payload: a one-part `multipart/mixed` document.
    ///
    /// Framing must match what the cloud-init agent parses: CRLF line
    /// endings, part headers in alphabetical order, and a trailing
    /// `--boundary--` terminator line.
    #[must_use]
    pub fn rendered(&self) -> String {
        format!(
            "Content-Type: multipart/mixed; boundary=\"{MIME_BOUNDARY}\"\r\n\
             MIME-Version: 1.0\r\n\
             \r\n\
             --{MIME_BOUNDARY}\r\n\
             Content-Disposition: attachment; filename=\"{SCRIPT_FILENAME}\"\r\n\
             Content-Transfer-Encoding: 7bit\r\n\
             Content-Type: {SCRIPT_CONTENT_TYPE}\r\n\
             Mime-Version: 1.0\r\n\
             \r\n\
             {script}\r\n\
             --{MIME_BOUNDARY}--\r\n",
            script = self.script,
        )
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
