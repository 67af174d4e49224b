use crate::commands::{CmdResult, Workspace};
use crate::view::{effective_records, Stats};

pub fn run(ws: &Workspace) -> CmdResult {
    let records = effective_records(&ws.records, &ws.overrides);
    CmdResult::default().with_stats(Stats::compute(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::overrides::OverrideStore;
    use crate::records::build_records;

    #[test]
    fn stats_cover_whole_dataset() {
        let mut ws = Workspace::new(
            build_records(&[
                InputTerm::new("\"rose", 12),
                InputTerm::new("tulip", 20),
                InputTerm::new("(peony", 1),
            ]),
            OverrideStore::new(),
        );
        ws.overrides.set_completed(2, true);

        let stats = run(&ws).stats.unwrap();
        assert_eq!(stats.total_terms, 3);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.formatting, 2);
        assert_eq!(stats.total_impact, 33);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.remaining, 2);
    }
}
