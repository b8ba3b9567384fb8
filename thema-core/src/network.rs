//! Category network as plain node and link lists.
//!
//! The hierarchy is `axis → category → subtheme → code → quote`. Codes hang
//! from the first subtheme of their category, or from the category itself
//! when the theme has no subthemes. Node ids are unique; links are emitted
//! once per member code, so a code shared by several quotes has several
//! incoming links from the same parent.
//!
//! [`filter_network`] prunes a built network down to its upper levels for
//! overview renderings.

use rustc_hash::FxHashSet;
use thema_types::{Analysis, NetworkData, NetworkLink, NetworkNode, NodeKind};

/// Id of the single root node.
pub const ROOT_ID: &str = "EJE: Central";

/// Codes per category drawn into the network.
pub const MAX_CODES_PER_CATEGORY: usize = 30;

/// Characters of a quote used in its node id.
pub const QUOTE_ID_PREFIX: usize = 40;

#[derive(Default)]
struct GraphBuilder {
    seen: FxHashSet<String>,
    data: NetworkData,
}

impl GraphBuilder {
    fn node(&mut self, id: String, kind: NodeKind) -> String {
        self.labelled(id, kind, None, None)
    }

    fn labelled(
        &mut self,
        id: String,
        kind: NodeKind,
        label: Option<String>,
        doc: Option<String>,
    ) -> String {
        if self.seen.insert(id.clone()) {
            self.data.nodes.push(NetworkNode {
                id: id.clone(),
                kind,
                label,
                doc,
            });
        }
        id
    }

    fn link(&mut self, source: &str, target: &str) {
        self.data.links.push(NetworkLink {
            source: source.to_owned(),
            target: target.to_owned(),
        });
    }
}

/// Builds the node/link description of `analysis`.
pub fn network_data(analysis: &Analysis) -> NetworkData {
    let mut g = GraphBuilder::default();
    let root = g.node(ROOT_ID.to_owned(), NodeKind::Axis);

    for group in &analysis.grouped {
        let label = &group.category;
        let cat = g.node(format!("CAT:{label}"), NodeKind::Category);
        g.link(&root, &cat);

        let subthemes: &[String] = analysis
            .themes
            .iter()
            .find(|t| &t.theme == label)
            .map(|t| t.subthemes.as_slice())
            .unwrap_or_default();

        let mut parent = cat.clone();
        for (i, st) in subthemes.iter().enumerate() {
            let sub = g.node(format!("SUB:{label}:{st}"), NodeKind::Subtheme);
            g.link(&cat, &sub);
            if i == 0 {
                parent = sub;
            }
        }

        for code in group.codes.iter().take(MAX_CODES_PER_CATEGORY) {
            let code_id = g.node(format!("COD:{label}:{}", code.code), NodeKind::Code);
            g.link(&parent, &code_id);

            let prefix: String = code.quote.chars().take(QUOTE_ID_PREFIX).collect();
            let quote_id = g.labelled(
                format!("CITA:{}:{prefix}", code.doc),
                NodeKind::Quote,
                Some(code.quote.clone()),
                Some(code.doc.clone()),
            );
            g.link(&code_id, &quote_id);
        }
    }

    tracing::trace!(
        nodes = g.data.nodes.len(),
        links = g.data.links.len(),
        "built category network"
    );
    g.data
}

/// Which levels of the hierarchy a filtered network keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NetworkFilter {
    /// Axis, categories and subthemes.
    #[default]
    Main,
    /// Axis and categories only.
    Categories,
    /// Every node.
    All,
}

impl NetworkFilter {
    /// Returns `true` if nodes of `kind` survive this filter.
    pub const fn keeps(self, kind: NodeKind) -> bool {
        match self {
            NetworkFilter::All => true,
            NetworkFilter::Main => {
                matches!(kind, NodeKind::Axis | NodeKind::Category | NodeKind::Subtheme)
            }
            NetworkFilter::Categories => matches!(kind, NodeKind::Axis | NodeKind::Category),
        }
    }
}

/// Keeps the nodes whose kind passes `filter`, and the links whose source
/// and target both survive. Node and link order is preserved.
pub fn filter_network(data: &NetworkData, filter: NetworkFilter) -> NetworkData {
    let nodes: Vec<NetworkNode> = data
        .nodes
        .iter()
        .filter(|n| filter.keeps(n.kind))
        .cloned()
        .collect();
    let kept: FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links = data
        .links
        .iter()
        .filter(|l| kept.contains(l.source.as_str()) && kept.contains(l.target.as_str()))
        .cloned()
        .collect();

    NetworkData { nodes, links }
}
