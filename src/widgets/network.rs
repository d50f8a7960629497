//! Telemetry panel widgets.
//!
//! These four widgets are static markup. Their fields are filled by the
//! push feed bridge through `NetworkPanels`, not by widget hooks.

use dashboard::widget::{ContentDescriptor, ProviderRegistry, StyleValues};

#[derive(Debug, Clone, Copy)]
pub struct Panel {
    pub id: &'static str,
    pub html: &'static str,
}

pub const PANELS: [Panel; 4] = [
    Panel {
        id: "traffic-data",
        html: concat!(
            "<h2>Traffic Data<span id=\"ws-status\"></span></h2>\n",
            "<div class=\"stat-item\"><span class=\"stat-label\">Upload:</span>",
            "<span class=\"stat-value\" id=\"upload-speed\">...</span></div>\n",
            "<div class=\"stat-item\"><span class=\"stat-label\">Download:</span>",
            "<span class=\"stat-value\" id=\"download-speed\">...</span></div>\n",
            "<div class=\"stat-item\"><span class=\"stat-label\">Total Sent:</span>",
            "<span class=\"stat-value\" id=\"total-sent\">...</span></div>\n",
            "<div class=\"stat-item\"><span class=\"stat-label\">Total Recv:</span>",
            "<span class=\"stat-value\" id=\"total-recv\">...</span></div>",
        ),
    },
    Panel {
        id: "listening-ports",
        html: concat!(
            "<h2>Listening Ports <span id=\"listening-count\" class=\"widget-count\"></span></h2>\n",
            "<pre id=\"listening-list\">Loading...</pre>",
        ),
    },
    Panel {
        id: "active-connections",
        html: concat!(
            "<h2>Active Connections <span id=\"active-count\" class=\"widget-count\"></span></h2>\n",
            "<pre id=\"active-list\">Loading...</pre>",
        ),
    },
    Panel {
        id: "live-traffic-log",
        html: "<h2>Live Traffic Log</h2>\n<pre id=\"traffic-log-list\">Monitoring...</pre>",
    },
];

impl Panel {
    #[must_use]
    pub fn content(self) -> ContentDescriptor {
        ContentDescriptor::new(self.id, self.html)
    }
}

pub fn register(providers: &mut ProviderRegistry) {
    for panel in PANELS {
        providers.register(panel.id, move |_saved: &StyleValues| panel.content());
    }
}
