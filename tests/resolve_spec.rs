use codeowners::models::*;
use codeowners::registry::Registry;
use codeowners::resolve::{paths_overlap, resolve_owners};
use speculate2::speculate;

fn team(name: &str, paths: &[&str]) -> Team {
    let mut team = Team::new(name, "");
    for path in paths {
        team.add_path_if_needed(path);
    }
    team
}

speculate! {
    before {
        let teams = vec![
            team("Foo", &["/Modules/Foo"]),
            team("FooBar", &["/Modules/Foo/Bar.txt"]),
            team("Core", &["/Modules", "/Sources/Core"]),
        ];
    }

    describe "resolve_owners" {
        it "matches a file below an owned directory" {
            let owners = resolve_owners("/Modules/Foo/Helpers.swift", &teams[..1]);
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].matched_paths, ["/Modules/Foo"]);
        }

        it "matches a shorter query against a longer owned path" {
            let owners = resolve_owners("/Modules/Foo", &teams[1..2]);
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].matched_paths, ["/Modules/Foo/Bar.txt"]);
        }

        it "compares whole segments" {
            assert!(resolve_owners("/Modules/Foobar", &teams[..1]).is_empty());
        }

        it "returns nothing for unrelated paths" {
            assert!(resolve_owners("/Unrelated/Path", &teams).is_empty());
        }

        it "keeps input team order" {
            let owners = resolve_owners("/Modules/Foo/Bar.txt", &teams);
            let names: Vec<&str> = owners.iter().map(|o| o.team_name.as_str()).collect();
            assert_eq!(names, ["Foo", "FooBar", "Core"]);
            assert_eq!(owners[2].matched_paths, ["/Modules"]);
        }

        it "reports the runtime id of each team" {
            let owners = resolve_owners("/Sources/Core/main.c", &teams);
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].team_id, teams[2].id);
        }
    }

    describe "paths_overlap" {
        it "is symmetric" {
            let pairs = [
                ("/A/B", "/A/B/C"),
                ("/A/B", "/A/C"),
                ("/A", "/AB"),
                ("/A/B/C", "/A/B/C"),
                ("/", "/A"),
            ];
            for (left, right) in pairs {
                assert_eq!(paths_overlap(left, right), paths_overlap(right, left));
            }
        }

        it "agrees with a segment prefix check" {
            let paths = ["/A", "/A/B", "/A/B/C", "/A/C", "/B", "/AB/C"];
            for owned in paths {
                for query in paths {
                    let owned_segments: Vec<&str> = owned.split('/').filter(|s| !s.is_empty()).collect();
                    let query_segments: Vec<&str> = query.split('/').filter(|s| !s.is_empty()).collect();
                    let expected = owned_segments.starts_with(&query_segments)
                        || query_segments.starts_with(&owned_segments);
                    assert_eq!(paths_overlap(owned, query), expected, "{} vs {}", owned, query);
                }
            }
        }
    }

    describe "registry owners" {
        it "delegates to resolution over the opened teams" {
            let registry = Registry::new(teams.clone());
            let owners = registry.owners("Modules/Foo");
            assert_eq!(owners.len(), 3);
            assert!(!registry.is_dirty());
        }
    }
}
