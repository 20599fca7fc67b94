// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::TestWorkspace;
use mantrack::domain::models::bounty::{BountyDocument, Target};
use mantrack::presentation::cli::Command;

fn add_target(website: &str, alias: &str, url: &str) -> Command {
    Command::AddTarget {
        website: website.to_string(),
        alias: alias.to_string(),
        url: url.to_string(),
    }
}

async fn read_document(ws: &TestWorkspace) -> BountyDocument {
    let content = tokio::fs::read_to_string(ws.bounty_path()).await.unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_missing_list_suggests_init() {
    let ws = TestWorkspace::new();
    let err = ws.run(Command::ShowBounty).await.unwrap_err();
    assert!(err.to_string().contains("init-bounty"));

    let out = ws.ok(Command::InitBounty).await;
    assert!(out.starts_with("Created empty bounty list"));
    let out = ws.ok(Command::InitBounty).await;
    assert!(out.starts_with("Bounty list already exists"));

    assert_eq!(ws.ok(Command::ShowBounty).await, "Bounty list is empty.\n");
}

#[tokio::test]
async fn test_group_and_target_lifecycle() {
    let ws = TestWorkspace::new();
    ws.ok(Command::InitBounty).await;
    ws.ok(Command::AddGroup {
        website: "mangakakalot".to_string(),
    })
    .await;

    let out = ws
        .ok(add_target(
            "mangakakalot",
            "solo",
            "https://mangakakalot.com/manga/solo",
        ))
        .await;
    assert_eq!(out, "Successfully add 'solo' to 'mangakakalot'\n");
    ws.ok(add_target(
        "mangakakalot",
        "tower",
        "https://mangakakalot.com/manga/tower",
    ))
    .await;

    let out = ws
        .ok(Command::UpdateTarget {
            website: "mangakakalot".to_string(),
            alias: "solo".to_string(),
            new_alias: Some("solo-leveling".to_string()),
            new_url: None,
        })
        .await;
    assert_eq!(out, "Successfully changed 'solo' from 'mangakakalot'\n");

    let document = read_document(&ws).await;
    assert_eq!(
        document.groups[0].targets,
        vec![
            Target::new("solo-leveling", "https://mangakakalot.com/manga/solo"),
            Target::new("tower", "https://mangakakalot.com/manga/tower"),
        ]
    );

    let listing = ws.ok(Command::ShowBounty).await;
    assert!(listing.contains("solo-leveling"));
    assert!(listing.contains("https://mangakakalot.com/manga/tower"));

    ws.ok(Command::RemoveTarget {
        website: "mangakakalot".to_string(),
        alias: "tower".to_string(),
    })
    .await;
    let out = ws
        .ok(Command::RemoveGroup {
            website: "mangakakalot".to_string(),
        })
        .await;
    assert!(out.contains("(1 targets)"));
    assert!(read_document(&ws).await.groups.is_empty());
}

#[tokio::test]
async fn test_rejected_mutations_leave_file_untouched() {
    let ws = TestWorkspace::new();
    ws.ok(Command::InitBounty).await;
    ws.ok(Command::AddGroup {
        website: "mangakakalot".to_string(),
    })
    .await;
    ws.ok(add_target("mangakakalot", "solo", "https://a.com/solo"))
        .await;
    let before = tokio::fs::read(ws.bounty_path()).await.unwrap();

    let rejected = vec![
        add_target("manganelo", "solo", "https://b.com/solo"),
        add_target("mangakakalot", "solo", "https://a.com/other"),
        add_target("mangakakalot", "bad", "not-a-url"),
        Command::AddGroup {
            website: "mangakakalot".to_string(),
        },
        Command::RemoveTarget {
            website: "mangakakalot".to_string(),
            alias: "ghost".to_string(),
        },
        Command::UpdateTarget {
            website: "mangakakalot".to_string(),
            alias: "solo".to_string(),
            new_alias: Some(" ".to_string()),
            new_url: None,
        },
        Command::RemoveGroup {
            website: "manganelo".to_string(),
        },
    ];
    for command in rejected {
        let label = format!("{:?}", command);
        assert!(ws.run(command).await.is_err(), "{} should fail", label);
    }

    assert_eq!(tokio::fs::read(ws.bounty_path()).await.unwrap(), before);
}

#[tokio::test]
async fn test_same_alias_in_different_groups() {
    let ws = TestWorkspace::new();
    ws.ok(Command::InitBounty).await;
    for website in ["mangakakalot", "manganelo"] {
        ws.ok(Command::AddGroup {
            website: website.to_string(),
        })
        .await;
        ws.ok(add_target(website, "solo", &format!("https://{}.com/solo", website)))
            .await;
    }

    let document = read_document(&ws).await;
    assert_eq!(document.target_count(), 2);
    assert_eq!(document.groups[1].targets[0].url, "https://manganelo.com/solo");
}

#[tokio::test]
async fn test_corrupt_list_is_reported() {
    let ws = TestWorkspace::new();
    tokio::fs::write(ws.bounty_path(), r#"{"sites": []}"#)
        .await
        .unwrap();

    let err = ws.run(Command::ShowBounty).await.unwrap_err();
    assert!(err.to_string().contains("corrupt"));
}
