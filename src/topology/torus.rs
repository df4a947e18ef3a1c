//! 3D torus (k-ary 3-cube with wraparound).
//!
//! Routers are numbered row-major with X varying fastest. Every router
//! gets a `Pos`/`Neg` link pair per dimension; dimension weights are
//! X=1, Y=2, Z=3 so table routing finishes X before Y before Z.
//!
//! Degenerate sides: a dimension of size 1 would only produce
//! self-links, so it is skipped. A dimension of size 2 keeps both links
//! to the single neighbour as two parallel channels on distinct ports.

use log::warn;

use crate::config::{ConfigurationError, NetworkOptions};
use crate::topology::links::LinkBuilder;
use crate::topology::partition::PartitionStrategy;
use crate::topology::types::{TopologyKind, TorusDims};
use crate::topology::TopologyBuilder;

/// A torus axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    X,
    Y,
    Z,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::X, Dimension::Y, Dimension::Z];

    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn weight(&self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn pos_port(&self) -> &'static str {
        match self {
            Self::X => "PosX",
            Self::Y => "PosY",
            Self::Z => "PosZ",
        }
    }

    pub fn neg_port(&self) -> &'static str {
        match self {
            Self::X => "NegX",
            Self::Y => "NegY",
            Self::Z => "NegZ",
        }
    }
}

/// Resolve torus dimensions from explicit options or a perfect cube
pub fn resolve_dims(options: &NetworkOptions) -> Result<TorusDims, ConfigurationError> {
    let num_routers = options.num_cpus;
    if num_routers == 0 {
        return Err(ConfigurationError::NonPositive { field: "num_cpus" });
    }

    match (options.torus_kx, options.torus_ky, options.torus_kz) {
        (Some(kx), Some(ky), Some(kz)) => {
            if kx.checked_mul(ky).and_then(|p| p.checked_mul(kz)) != Some(num_routers) {
                return Err(ConfigurationError::DimensionMismatch { kx, ky, kz, routers: num_routers });
            }
            Ok(TorusDims::new(kx, ky, kz))
        }
        (None, None, None) => {
            let k = (num_routers as f64).cbrt().round() as usize;
            if k.checked_pow(3) != Some(num_routers) {
                return Err(ConfigurationError::NotPerfectCube(num_routers));
            }
            Ok(TorusDims::new(k, k, k))
        }
        _ => Err(ConfigurationError::PartialDimensions),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Torus3D {
    dims: TorusDims,
}

impl Torus3D {
    pub fn new(options: &NetworkOptions) -> Result<Self, ConfigurationError> {
        Ok(Self { dims: resolve_dims(options)? })
    }

    pub fn dims(&self) -> TorusDims {
        self.dims
    }

    /// Neighbour of `router` one step along `dim`, wrapping around
    pub fn neighbour(&self, router: usize, dim: Dimension, positive: bool) -> usize {
        let (x, y, z) = self.dims.id_to_coord(router);
        let mut coord = [x, y, z];
        let side = self.dims.sides()[dim.index()];
        let c = coord[dim.index()];
        coord[dim.index()] = if positive { (c + 1) % side } else { (c + side - 1) % side };
        self.dims.coord_to_id(coord[0], coord[1], coord[2])
    }

    /// Internal links the torus emits: two per router per non-unit side
    pub fn expected_int_links(&self) -> usize {
        let active = self.dims.sides().iter().filter(|side| **side > 1).count();
        2 * active * self.dims.num_routers()
    }
}

impl TopologyBuilder for Torus3D {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Torus3D
    }

    fn num_routers(&self) -> usize {
        self.dims.num_routers()
    }

    fn partition_strategy(&self) -> PartitionStrategy {
        PartitionStrategy::Interleaved
    }

    fn build_internal_links(&self, links: &mut LinkBuilder) {
        let TorusDims { kx, ky, kz } = self.dims;

        for dim in Dimension::ALL {
            if self.dims.sides()[dim.index()] == 1 {
                warn!("Torus {} has unit {:?} side; skipping self-links in that dimension", self.dims, dim);
                continue;
            }

            for z in 0..kz {
                for y in 0..ky {
                    for x in 0..kx {
                        let src = self.dims.coord_to_id(x, y, z);
                        let pos = self.neighbour(src, dim, true);
                        let neg = self.neighbour(src, dim, false);
                        links.int_link(src, pos, dim.pos_port(), dim.neg_port(), dim.weight());
                        links.int_link(src, neg, dim.neg_port(), dim.pos_port(), dim.weight());
                    }
                }
            }
        }
    }
}
