use crate::domain::model::{Backfill, BackfillSource, ModulesByKey, ResourceGroups};

/// Gives every group member that reported no modules a copy of another module list.
///
/// Donors are tried in this order:
/// 1. the group's own entry in `modules`, when it is non-empty;
/// 2. the first member of the same group whose list is non-empty at that point.
///
/// Groups are visited in catalog order and members in list order, so a list
/// filled earlier in the pass can donate to a later member but never to an
/// earlier one. Non-empty lists are never touched and the group's own key is
/// never created. Every member ends up with a key, possibly mapped to an empty
/// list when no donor exists.
///
/// Returns the substitutions in the order they were made.
pub fn populate_empty_resources(
    groups: &ResourceGroups,
    modules: &mut ModulesByKey,
) -> Vec<Backfill> {
    let mut backfills = Vec::new();

    for (group, members) in groups.iter() {
        let group_count = modules.count(group);
        tracing::debug!("GROUP: {} : {}", group, group_count);

        for rp in members {
            let rp_count = modules.get_or_insert_default(rp).len();
            tracing::debug!("\t{} : {}", rp, rp_count);
            if rp_count > 0 {
                continue;
            }

            let source = if group_count > 0 {
                Some(BackfillSource::Group(group.clone()))
            } else {
                members
                    .iter()
                    .find(|peer| modules.count(peer) > 0)
                    .map(|peer| BackfillSource::Peer(peer.clone()))
            };

            let Some(source) = source else {
                tracing::debug!("no modules available in group '{}' for RP '{}'", group, rp);
                continue;
            };

            let donated = modules.get(source.key()).map(<[_]>::to_vec).unwrap_or_default();
            modules.insert(rp.clone(), donated);
            match &source {
                BackfillSource::Group(g) => {
                    tracing::info!("using modules from group '{}' for RP '{}'", g, rp)
                }
                BackfillSource::Peer(p) => {
                    tracing::info!("using modules from RP '{}' for RP '{}'", p, rp)
                }
            }
            backfills.push(Backfill {
                resource: rp.clone(),
                source,
            });
        }
    }

    backfills
}
