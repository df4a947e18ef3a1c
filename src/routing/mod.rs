//! Port-direction routing over generated topologies.
//!
//! These helpers pick the output port a packet at router `cur` should
//! take towards router `dest`, using the port names the topology
//! builders emit. They let a consumer (or a test) walk a route hop by
//! hop through a `Graph` without building routing tables.

use rand::Rng;

use crate::topology::butterfly::{down_port, up_port};
use crate::topology::ring::{CLOCKWISE, COUNTER_CLOCKWISE};
use crate::topology::torus::Dimension;
use crate::topology::types::{Graph, TopologyKind, TorusDims};

/// Output port used once the destination router is reached
pub const LOCAL: &str = "Local";

/// Errors raised while computing or following a route
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("router {router} out of range (network has {num_routers} routers)")]
    RouterOutOfRange { router: usize, num_routers: usize },

    #[error("router {router} has no output port {port}")]
    MissingPort { router: usize, port: String },

    #[error("route from {src} to {dest} did not converge within {hops} hops")]
    NoProgress { src: usize, dest: usize, hops: usize },

    #[error("torus routing requires dimensions")]
    MissingDimensions,
}

/// Routing algorithm matched to a topology's port naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingAlgorithm {
    /// Shortest direction around the ring, ties clockwise
    Ring,
    /// Dimension-order X, Y, Z; shortest wrap direction, ties positive
    Torus3D(TorusDims),
    /// Random productive direction, XY plane before Z
    Torus3DAdaptive(TorusDims),
    /// Resolve the highest differing address bit first
    Butterfly,
}

impl RoutingAlgorithm {
    /// Deterministic algorithm for a topology family
    pub fn for_topology(kind: TopologyKind, dims: Option<TorusDims>) -> Result<Self, RoutingError> {
        Ok(match kind {
            TopologyKind::Ring => Self::Ring,
            TopologyKind::Butterfly => Self::Butterfly,
            TopologyKind::Torus3D => Self::Torus3D(dims.ok_or(RoutingError::MissingDimensions)?),
        })
    }

    /// Output port at `cur` for a packet heading to `dest`
    pub fn outport<R: Rng>(
        &self,
        num_routers: usize,
        cur: usize,
        dest: usize,
        rng: &mut R,
    ) -> Result<String, RoutingError> {
        check_router(cur, num_routers)?;
        check_router(dest, num_routers)?;
        if cur == dest {
            return Ok(LOCAL.to_string());
        }

        Ok(match self {
            Self::Ring => outport_ring(num_routers, cur, dest).to_string(),
            Self::Torus3D(dims) => outport_torus3d(dims, cur, dest).to_string(),
            Self::Torus3DAdaptive(dims) => outport_torus3d_adaptive(dims, cur, dest, rng).to_string(),
            Self::Butterfly => outport_butterfly(num_routers, cur, dest),
        })
    }
}

fn check_router(router: usize, num_routers: usize) -> Result<(), RoutingError> {
    if router >= num_routers {
        return Err(RoutingError::RouterOutOfRange { router, num_routers });
    }
    Ok(())
}

fn outport_ring(num_routers: usize, cur: usize, dest: usize) -> &'static str {
    let cw_dist = (dest + num_routers - cur) % num_routers;
    let ccw_dist = (cur + num_routers - dest) % num_routers;
    if cw_dist <= ccw_dist {
        CLOCKWISE
    } else {
        COUNTER_CLOCKWISE
    }
}

fn outport_torus3d(dims: &TorusDims, cur: usize, dest: usize) -> &'static str {
    let (cx, cy, cz) = dims.id_to_coord(cur);
    let (dx, dy, dz) = dims.id_to_coord(dest);
    let current = [cx, cy, cz];
    let target = [dx, dy, dz];

    for dim in Dimension::ALL {
        let i = dim.index();
        let side = dims.sides()[i];
        let forward = (target[i] + side - current[i]) % side;
        if forward == 0 {
            continue;
        }
        let backward = side - forward;
        return if forward <= backward { dim.pos_port() } else { dim.neg_port() };
    }
    LOCAL
}

/// Signed shortest offset along a ring of `side` routers
fn wrapped_delta(cur: usize, dest: usize, side: usize) -> isize {
    let side = side as isize;
    let mut d = dest as isize - cur as isize;
    if d > side / 2 {
        d -= side;
    }
    if d < -side / 2 {
        d += side;
    }
    d
}

fn outport_torus3d_adaptive<R: Rng>(dims: &TorusDims, cur: usize, dest: usize, rng: &mut R) -> &'static str {
    let (cx, cy, cz) = dims.id_to_coord(cur);
    let (tx, ty, tz) = dims.id_to_coord(dest);
    let dx = wrapped_delta(cx, tx, dims.kx);
    let dy = wrapped_delta(cy, ty, dims.ky);
    let dz = wrapped_delta(cz, tz, dims.kz);

    let mut candidates = Vec::with_capacity(2);
    if dx != 0 || dy != 0 {
        for (d, dim) in [(dx, Dimension::X), (dy, Dimension::Y)] {
            if d > 0 {
                candidates.push(dim.pos_port());
            } else if d < 0 {
                candidates.push(dim.neg_port());
            }
        }
    } else if dz > 0 {
        candidates.push(Dimension::Z.pos_port());
    } else if dz < 0 {
        candidates.push(Dimension::Z.neg_port());
    }

    match candidates.len() {
        0 => LOCAL,
        1 => candidates[0],
        n => candidates[rng.gen_range(0..n)],
    }
}

fn outport_butterfly(num_routers: usize, cur: usize, dest: usize) -> String {
    let diff = cur ^ dest;
    let stage = (usize::BITS - 1 - diff.leading_zeros()) as usize;
    debug_assert!((1 << stage) < num_routers.max(2));
    if dest & (1 << stage) != 0 {
        up_port(stage)
    } else {
        down_port(stage)
    }
}

/// Follow `algorithm` through `graph` from `src` to `dest`
///
/// # Returns
/// * `Ok(Vec<usize>)` - Routers visited, starting with `src` and ending with `dest`
/// * `Err(RoutingError)` - An endpoint is out of range, a chosen port does not exist
///   or the walk does not converge
pub fn trace_route<R: Rng>(
    graph: &Graph,
    algorithm: &RoutingAlgorithm,
    src: usize,
    dest: usize,
    rng: &mut R,
) -> Result<Vec<usize>, RoutingError> {
    let num_routers = graph.num_routers();
    check_router(src, num_routers)?;
    check_router(dest, num_routers)?;
    let mut path = vec![src];
    let mut cur = src;

    while cur != dest {
        if path.len() > num_routers {
            return Err(RoutingError::NoProgress { src, dest, hops: path.len() - 1 });
        }
        let port = algorithm.outport(num_routers, cur, dest, rng)?;
        let link = graph
            .out_port(cur, &port)
            .ok_or(RoutingError::MissingPort { router: cur, port })?;
        cur = link.dst;
        path.push(cur);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkOptions;
    use crate::topology::{build_topology, Node, NodeType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn graph(kind: TopologyKind, options: &NetworkOptions) -> Graph {
        let nodes: Vec<Node> = (0..options.num_cpus)
            .map(|i| Node::new(format!("l1_cntrl{}", i), NodeType::L1Cache))
            .collect();
        build_topology(kind, &nodes, options).unwrap()
    }

    #[test]
    fn test_ring_prefers_shorter_direction() {
        let mut rng = StdRng::seed_from_u64(1);
        let algo = RoutingAlgorithm::Ring;
        assert_eq!(algo.outport(8, 0, 3, &mut rng).unwrap(), CLOCKWISE);
        assert_eq!(algo.outport(8, 0, 5, &mut rng).unwrap(), COUNTER_CLOCKWISE);
        // tie
        assert_eq!(algo.outport(8, 0, 4, &mut rng).unwrap(), CLOCKWISE);
        assert_eq!(algo.outport(8, 2, 2, &mut rng).unwrap(), LOCAL);
    }

    #[test]
    fn test_out_of_range_router() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            RoutingAlgorithm::Ring.outport(4, 0, 9, &mut rng),
            Err(RoutingError::RouterOutOfRange { router: 9, num_routers: 4 })
        );
    }

    #[test]
    fn test_trace_route_rejects_out_of_range_endpoints() {
        let mut rng = StdRng::seed_from_u64(1);
        let ring4 = graph(TopologyKind::Ring, &NetworkOptions::new(4));
        let algo = RoutingAlgorithm::Ring;
        assert_eq!(
            trace_route(&ring4, &algo, 99, 99, &mut rng),
            Err(RoutingError::RouterOutOfRange { router: 99, num_routers: 4 })
        );
        assert_eq!(
            trace_route(&ring4, &algo, 0, 4, &mut rng),
            Err(RoutingError::RouterOutOfRange { router: 4, num_routers: 4 })
        );
        assert_eq!(trace_route(&ring4, &algo, 2, 2, &mut rng), Ok(vec![2]));
    }

    #[test]
    fn test_torus_dimension_order() {
        let dims = TorusDims::new(4, 4, 4);
        let algo = RoutingAlgorithm::Torus3D(dims);
        let mut rng = StdRng::seed_from_u64(1);
        let dest = dims.coord_to_id(3, 1, 2);
        assert_eq!(algo.outport(64, 0, dest, &mut rng).unwrap(), "NegX");
        let dest = dims.coord_to_id(0, 1, 2);
        assert_eq!(algo.outport(64, 0, dest, &mut rng).unwrap(), "PosY");
        let dest = dims.coord_to_id(0, 0, 2);
        assert_eq!(algo.outport(64, 0, dest, &mut rng).unwrap(), "PosZ");
    }

    #[test]
    fn test_butterfly_highest_bit_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let algo = RoutingAlgorithm::Butterfly;
        assert_eq!(algo.outport(8, 0, 5, &mut rng).unwrap(), "Up_s2");
        assert_eq!(algo.outport(8, 5, 1, &mut rng).unwrap(), "Down_s2");
        assert_eq!(algo.outport(8, 4, 6, &mut rng).unwrap(), "Up_s1");
    }

    #[test]
    fn test_all_pairs_reach_destination() {
        let mut rng = StdRng::seed_from_u64(7);
        let cases = [
            (TopologyKind::Ring, NetworkOptions::new(6)),
            (TopologyKind::Butterfly, NetworkOptions::new(8)),
            (TopologyKind::Torus3D, NetworkOptions::new(24).with_torus_dims(4, 3, 2)),
        ];
        for (kind, options) in cases {
            let g = graph(kind, &options);
            let dims = resolve_dims_for(kind, &options);
            let algo = RoutingAlgorithm::for_topology(kind, dims).unwrap();
            for src in 0..options.num_cpus {
                for dest in 0..options.num_cpus {
                    let path = trace_route(&g, &algo, src, dest, &mut rng).unwrap();
                    assert_eq!(path.first(), Some(&src));
                    assert_eq!(path.last(), Some(&dest));
                }
            }
        }
    }

    #[test]
    fn test_adaptive_torus_reaches_destination() {
        let options = NetworkOptions::new(64);
        let g = graph(TopologyKind::Torus3D, &options);
        let algo = RoutingAlgorithm::Torus3DAdaptive(TorusDims::new(4, 4, 4));
        let mut rng = StdRng::seed_from_u64(42);
        for dest in 0..64 {
            let path = trace_route(&g, &algo, 0, dest, &mut rng).unwrap();
            assert_eq!(path.last(), Some(&dest));
            // minimal: at most 2 hops per dimension
            assert!(path.len() - 1 <= 6);
        }
    }

    #[test]
    fn test_missing_port_reported() {
        let g = graph(TopologyKind::Ring, &NetworkOptions::new(4));
        let mut rng = StdRng::seed_from_u64(1);
        let err = trace_route(&g, &RoutingAlgorithm::Butterfly, 0, 1, &mut rng).unwrap_err();
        assert_eq!(err, RoutingError::MissingPort { router: 0, port: "Up_s0".to_string() });
    }

    fn resolve_dims_for(kind: TopologyKind, options: &NetworkOptions) -> Option<TorusDims> {
        match kind {
            TopologyKind::Torus3D => crate::topology::resolve_dims(options).ok(),
            _ => None,
        }
    }
}
