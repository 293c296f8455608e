//! Metallic pass rewiring.
//!
//! Hosts have no native metallic bake. The shader's metallic source is
//! routed straight into the material output's surface and baked as
//! emission; afterwards the shader is wired back.

use crate::error::{BakeError, BakeResult};
use crate::graph::{MaterialGraph, NodeId, NodeKind, SocketRef};

/// Input socket on the principled shader carrying the metallic value.
pub const METALLIC_INPUT: &str = "Metallic";
/// Shader output socket.
pub const BSDF_OUTPUT: &str = "BSDF";
/// Surface input on the material output.
pub const SURFACE_INPUT: &str = "Surface";

fn shader_nodes(graph: &MaterialGraph, material: &str) -> BakeResult<(NodeId, NodeId)> {
    let bsdf = graph.find_by_kind(&NodeKind::PrincipledBsdf);
    let output = graph.find_by_kind(&NodeKind::MaterialOutput);
    match (bsdf, output) {
        (Some(bsdf), Some(output)) => Ok((bsdf, output)),
        _ => Err(BakeError::MissingShaderNodes {
            material: material.to_string(),
        }),
    }
}

/// Links whatever feeds the shader's metallic input into the output surface.
///
/// Returns true when a link was rerouted. An unlinked metallic input leaves
/// the graph untouched.
pub fn reroute_metallic(graph: &mut MaterialGraph, material: &str) -> BakeResult<bool> {
    let (bsdf, output) = shader_nodes(graph, material)?;
    let source = match graph.link_into(&SocketRef::new(bsdf, METALLIC_INPUT)) {
        Some(link) => link.from.clone(),
        None => return Ok(false),
    };
    graph.connect(source, SocketRef::new(output, SURFACE_INPUT))?;
    log::debug!("{}: metallic source routed to surface", material);
    Ok(true)
}

/// Clears the output surface and wires the shader back into it.
pub fn restore_surface(graph: &mut MaterialGraph, material: &str) -> BakeResult<()> {
    let (bsdf, output) = shader_nodes(graph, material)?;
    let surface = SocketRef::new(output, SURFACE_INPUT);
    while graph.disconnect_input(&surface).is_some() {}
    graph.connect(SocketRef::new(bsdf, BSDF_OUTPUT), surface)?;
    log::debug!("{}: shader reconnected to surface", material);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeTemplate;

    struct Fixture {
        graph: MaterialGraph,
        bsdf: NodeId,
        output: NodeId,
        map: NodeId,
    }

    fn fixture(link_metallic: bool) -> Fixture {
        let mut graph = MaterialGraph::new();
        let bsdf = graph.add_node(NodeTemplate::principled_bsdf("Principled BSDF"));
        let output = graph.add_node(NodeTemplate::material_output("Material Output"));
        let map = graph.add_node(NodeTemplate::other(
            "TEX_IMAGE",
            "Metal Map",
            &["Vector"],
            &["Color", "Alpha"],
        ));
        graph
            .connect(
                SocketRef::new(bsdf, BSDF_OUTPUT),
                SocketRef::new(output, SURFACE_INPUT),
            )
            .unwrap();
        if link_metallic {
            graph
                .connect(
                    SocketRef::new(map, "Color"),
                    SocketRef::new(bsdf, METALLIC_INPUT),
                )
                .unwrap();
        }
        Fixture {
            graph,
            bsdf,
            output,
            map,
        }
    }

    #[test]
    fn test_reroute_links_metallic_source_to_surface() {
        let mut f = fixture(true);
        assert!(reroute_metallic(&mut f.graph, "Mat").unwrap());
        let surface = f.graph.link_into(&SocketRef::new(f.output, SURFACE_INPUT)).unwrap();
        assert_eq!(surface.from, SocketRef::new(f.map, "Color"));
        // The metallic input keeps its own link.
        assert!(f
            .graph
            .link_into(&SocketRef::new(f.bsdf, METALLIC_INPUT))
            .is_some());
    }

    #[test]
    fn test_reroute_without_metallic_link_is_noop() {
        let mut f = fixture(false);
        let before = f.graph.clone();
        assert!(!reroute_metallic(&mut f.graph, "Mat").unwrap());
        assert_eq!(f.graph, before);
    }

    #[test]
    fn test_restore_reconnects_shader() {
        let mut f = fixture(true);
        reroute_metallic(&mut f.graph, "Mat").unwrap();
        restore_surface(&mut f.graph, "Mat").unwrap();
        let surface = f.graph.link_into(&SocketRef::new(f.output, SURFACE_INPUT)).unwrap();
        assert_eq!(surface.from, SocketRef::new(f.bsdf, BSDF_OUTPUT));
    }

    #[test]
    fn test_missing_nodes_is_structural_error() {
        let mut graph = MaterialGraph::new();
        graph.add_node(NodeTemplate::material_output("Material Output"));
        let err = reroute_metallic(&mut graph, "Mat").unwrap_err();
        assert!(matches!(err, BakeError::MissingShaderNodes { ref material } if material == "Mat"));
        assert!(restore_surface(&mut graph, "Mat").is_err());
    }
}
