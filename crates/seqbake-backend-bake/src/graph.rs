//! Material node graph.
//!
//! Nodes carry a kind tag, a name, a location, and named input and output
//! sockets. Links run from an output socket to an input socket; an input
//! accepts at most one link.

use seqbake_spec::TextureSampling;
use serde::{Deserialize, Serialize};

use crate::error::{BakeError, BakeResult};

/// Identifier of a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Principled shader.
    PrincipledBsdf,
    /// Material output.
    MaterialOutput,
    /// Image texture.
    ImageTexture,
    /// Any other node, by host type name.
    Other(String),
}

impl NodeKind {
    /// Host type identifier.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::PrincipledBsdf => "BSDF_PRINCIPLED",
            NodeKind::MaterialOutput => "OUTPUT_MATERIAL",
            NodeKind::ImageTexture => "TEX_IMAGE",
            NodeKind::Other(name) => name,
        }
    }
}

/// An input or output socket of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    /// Owning node.
    pub node: NodeId,
    /// Socket name.
    pub socket: String,
}

impl SocketRef {
    /// Creates a socket reference.
    pub fn new(node: NodeId, socket: impl Into<String>) -> Self {
        Self {
            node,
            socket: socket.into(),
        }
    }
}

/// A link from an output socket to an input socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Output socket.
    pub from: SocketRef,
    /// Input socket.
    pub to: SocketRef,
}

/// Image assignment of an image texture node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Host image name.
    pub image: String,
    /// Sampling settings.
    pub sampling: TextureSampling,
}

/// One node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub location: [f32; 2],
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Set on image texture nodes.
    pub texture: Option<TextureBinding>,
}

/// Template for a node to add.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub kind: NodeKind,
    pub name: String,
    pub location: [f32; 2],
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub texture: Option<TextureBinding>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl NodeTemplate {
    /// A principled shader with its commonly wired sockets.
    pub fn principled_bsdf(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::PrincipledBsdf,
            name: name.into(),
            location: [0.0, 0.0],
            inputs: names(&[
                "Base Color",
                "Metallic",
                "Roughness",
                "Normal",
                "Emission Color",
                "Alpha",
            ]),
            outputs: names(&["BSDF"]),
            texture: None,
        }
    }

    /// A material output node.
    pub fn material_output(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::MaterialOutput,
            name: name.into(),
            location: [300.0, 0.0],
            inputs: names(&["Surface", "Volume", "Displacement"]),
            outputs: Vec::new(),
            texture: None,
        }
    }

    /// An image texture node bound to a host image.
    pub fn image_texture(
        name: impl Into<String>,
        image: impl Into<String>,
        sampling: TextureSampling,
    ) -> Self {
        Self {
            kind: NodeKind::ImageTexture,
            name: name.into(),
            location: [0.0, 0.0],
            inputs: names(&["Vector"]),
            outputs: names(&["Color", "Alpha"]),
            texture: Some(TextureBinding {
                image: image.into(),
                sampling,
            }),
        }
    }

    /// Any other node type.
    pub fn other(kind: impl Into<String>, name: impl Into<String>, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            kind: NodeKind::Other(kind.into()),
            name: name.into(),
            location: [0.0, 0.0],
            inputs: names(inputs),
            outputs: names(outputs),
            texture: None,
        }
    }

    /// Sets the location.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }
}

/// A material's node graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    active: Option<NodeId>,
    next_id: u32,
}

impl MaterialGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, template: NodeTemplate) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            kind: template.kind,
            name: template.name,
            location: template.location,
            inputs: template.inputs,
            outputs: template.outputs,
            texture: template.texture,
        });
        id
    }

    /// Removes a node together with every link touching it.
    pub fn remove_node(&mut self, id: NodeId) -> BakeResult<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(BakeError::UnknownNode(id))?;
        self.links.retain(|l| l.from.node != id && l.to.node != id);
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(self.nodes.remove(index))
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// First node of a kind.
    pub fn find_by_kind(&self, kind: &NodeKind) -> Option<NodeId> {
        self.nodes.iter().find(|n| &n.kind == kind).map(|n| n.id)
    }

    /// Links `from` (an output socket) to `to` (an input socket), replacing
    /// any link already feeding `to`.
    pub fn connect(&mut self, from: SocketRef, to: SocketRef) -> BakeResult<()> {
        self.check_socket(&from, false)?;
        self.check_socket(&to, true)?;
        self.links.retain(|l| l.to != to);
        self.links.push(Link { from, to });
        Ok(())
    }

    /// Removes the link feeding an input socket, returning it.
    pub fn disconnect_input(&mut self, to: &SocketRef) -> Option<Link> {
        let index = self.links.iter().position(|l| &l.to == to)?;
        Some(self.links.remove(index))
    }

    /// The link feeding an input socket.
    pub fn link_into(&self, to: &SocketRef) -> Option<&Link> {
        self.links.iter().find(|l| &l.to == to)
    }

    /// Marks a node as the active node.
    pub fn set_active(&mut self, id: NodeId) -> BakeResult<()> {
        if self.node(id).is_none() {
            return Err(BakeError::UnknownNode(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// The active node.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    fn check_socket(&self, socket: &SocketRef, input: bool) -> BakeResult<()> {
        let node = self
            .node(socket.node)
            .ok_or(BakeError::UnknownNode(socket.node))?;
        let list = if input { &node.inputs } else { &node.outputs };
        if list.iter().any(|s| s == &socket.socket) {
            Ok(())
        } else {
            Err(BakeError::UnknownSocket {
                node: node.name.clone(),
                socket: socket.socket.clone(),
                direction: if input { "input" } else { "output" },
            })
        }
    }
}
