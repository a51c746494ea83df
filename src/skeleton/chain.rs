//! Arena of branches linked into limb chains.

use crate::core::{Error, Result};
use crate::shaping::ShaperKind;
use crate::skeleton::branch::{Branch, BranchId};

/// Owns every branch of a tree. Branches refer to each other by [`BranchId`].
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    branches: Vec<Branch>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch and return its assigned id
    pub fn add_branch(&mut self, mut branch: Branch) -> BranchId {
        let id = BranchId(self.branches.len() as u32);
        branch.id = id;
        self.branches.push(branch);
        id
    }

    /// Set `next` as the follow-up of `branch`
    pub fn link(&mut self, branch: BranchId, next: BranchId) -> Result<()> {
        if self.get(next).is_none() {
            return Err(Error::UnknownBranch(next));
        }
        let entry = self.get_mut(branch).ok_or(Error::UnknownBranch(branch))?;
        entry.follow_up = Some(next);
        Ok(())
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BranchId) -> Option<&mut Branch> {
        self.branches.get_mut(id.0 as usize)
    }

    pub fn follow_up(&self, id: BranchId) -> Option<BranchId> {
        self.get(id)?.follow_up
    }

    /// Branch ids from `first` along the follow-up links.
    ///
    /// Stops at the first revisited branch so a malformed cycle terminates.
    pub fn chain(&self, first: BranchId) -> Vec<BranchId> {
        let mut chain = Vec::new();
        let mut visited = vec![false; self.branches.len()];
        let mut current = self.get(first).map(|b| b.id);

        while let Some(id) = current {
            let index = id.0 as usize;
            if index >= visited.len() || visited[index] {
                break;
            }
            visited[index] = true;
            chain.push(id);
            current = self.follow_up(id);
        }

        chain
    }

    /// Drop every generated ring registry, keeping authored shapers.
    ///
    /// Must run between independent builds so no registry carries stale rings.
    pub fn reset_generated_shapers(&mut self) -> usize {
        let mut reset = 0;
        for branch in &mut self.branches {
            let sections = match &branch.shaper {
                ShaperKind::Custom(custom) if !custom.is_authored() => custom.sections().clone(),
                _ => continue,
            };
            branch.shaper = ShaperKind::Default(sections);
            reset += 1;
        }
        if reset > 0 {
            log::debug!("Reset {} generated shapers", reset);
        }
        reset
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::{CustomShaper, Ring, RingRegistry, SectionTable};
    use crate::skeleton::{BranchCurve, GirthProfile};
    use crate::core::types::Vec3;

    fn make_branch() -> Branch {
        Branch::new(BranchCurve::straight(Vec3::Y, 1.0), GirthProfile::default())
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut skeleton = Skeleton::new();
        let a = skeleton.add_branch(make_branch());
        let b = skeleton.add_branch(make_branch());
        assert_eq!(a, BranchId(0));
        assert_eq!(b, BranchId(1));
        assert_eq!(skeleton.get(b).map(|branch| branch.id), Some(b));
    }

    #[test]
    fn test_chain_follows_links() {
        let mut skeleton = Skeleton::new();
        let a = skeleton.add_branch(make_branch());
        let b = skeleton.add_branch(make_branch());
        let c = skeleton.add_branch(make_branch());
        skeleton.link(a, b).unwrap();
        skeleton.link(b, c).unwrap();

        assert_eq!(skeleton.chain(a), vec![a, b, c]);
        assert_eq!(skeleton.chain(b), vec![b, c]);
        assert_eq!(skeleton.follow_up(c), None);
    }

    #[test]
    fn test_chain_stops_on_cycle() {
        let mut skeleton = Skeleton::new();
        let a = skeleton.add_branch(make_branch());
        let b = skeleton.add_branch(make_branch());
        skeleton.link(a, b).unwrap();
        skeleton.link(b, a).unwrap();

        assert_eq!(skeleton.chain(a), vec![a, b]);
    }

    #[test]
    fn test_link_unknown_branch() {
        let mut skeleton = Skeleton::new();
        let a = skeleton.add_branch(make_branch());
        assert!(matches!(skeleton.link(a, BranchId(7)), Err(Error::UnknownBranch(BranchId(7)))));
        assert!(skeleton.chain(BranchId(7)).is_empty());
    }

    #[test]
    fn test_reset_keeps_authored_shapers() {
        let mut registry = RingRegistry::new();
        registry.insert_ring(0.5, Ring::ellipse(5, 1.0, 1.0));

        let mut skeleton = Skeleton::new();
        let authored = skeleton.add_branch(make_branch().with_shaper(ShaperKind::Custom(
            CustomShaper::authored(registry.clone(), SectionTable::new()),
        )));
        let generated = skeleton.add_branch(make_branch().with_shaper(ShaperKind::Custom(
            CustomShaper::generated(registry, SectionTable::new()),
        )));

        assert_eq!(skeleton.reset_generated_shapers(), 1);
        assert!(skeleton.get(authored).unwrap().shaper.is_authored());
        assert!(matches!(skeleton.get(generated).unwrap().shaper, ShaperKind::Default(_)));
    }
}
