//! Built-in catalog of installable reconnaissance tools
//!
//! Seeds the install state on first use. Entries persisted to disk take
//! precedence afterwards, so a reinstall picks up where the last run left
//! off.

use crate::core::tool::ToolSpec;
use crate::install::state::InstallState;

/// Build the initial install state from the built-in catalog
pub fn bootstrap() -> InstallState {
    let mut state = InstallState::new();

    state.insert(
        "go".to_string(),
        ToolSpec::new(&[], &["apt-get install -y -q golang"], false),
    );

    state.insert(
        "masscan".to_string(),
        ToolSpec::new(
            &[],
            &[
                "git clone https://github.com/robertdavidgraham/masscan /tmp/masscan",
                "make -s -j -C /tmp/masscan",
                "mv /tmp/masscan/bin/masscan /usr/local/bin/masscan",
                "rm -rf /tmp/masscan",
            ],
            false,
        ),
    );

    // go tools chain subshells during install, so they get shell=true
    state.insert(
        "amass".to_string(),
        ToolSpec::new(&["go"], &["go get -u github.com/OWASP/Amass/v3/..."], true),
    );

    state.insert(
        "gobuster".to_string(),
        ToolSpec::new(&["go"], &["go get github.com/OJ/gobuster"], true),
    );

    state.insert(
        "recursive-gobuster".to_string(),
        ToolSpec::new(
            &["gobuster"],
            &["git clone https://github.com/epi052/recursive-gobuster.git /opt/recursive-gobuster"],
            false,
        ),
    );

    state.insert(
        "aquatone".to_string(),
        ToolSpec::new(
            &[],
            &[
                "mkdir /tmp/aquatone",
                "wget -q https://github.com/michenriksen/aquatone/releases/download/v1.7.0/aquatone_linux_amd64_1.7.0.zip -O /tmp/aquatone/aquatone.zip",
                "unzip /tmp/aquatone/aquatone.zip -d /tmp/aquatone",
                "mv /tmp/aquatone/aquatone /opt/aquatone",
                "rm -rf /tmp/aquatone",
            ],
            false,
        ),
    );

    state.insert(
        "corscanner".to_string(),
        ToolSpec::new(
            &[],
            &[
                "git clone https://github.com/chenjj/CORScanner.git /opt/CORScanner",
                "pip install -r /opt/CORScanner/requirements.txt && pip install future",
            ],
            true,
        ),
    );

    state.insert(
        "tko-subs".to_string(),
        ToolSpec::new(&["go"], &["go get github.com/anshumanbh/tko-subs"], true),
    );

    state.insert(
        "subjack".to_string(),
        ToolSpec::new(&["go"], &["go get github.com/haccer/subjack"], true),
    );

    state.insert(
        "seclists".to_string(),
        ToolSpec::new(
            &[],
            &["git clone https://github.com/danielmiessler/SecLists.git /usr/share/seclists"],
            false,
        ),
    );

    state
}
