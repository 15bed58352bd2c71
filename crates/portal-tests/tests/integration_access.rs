// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Access Integration Tests
//!
//! Route guard and sidebar behavior over sessions read from a store.
//!
//! ## Test Categories
//!
//! - Guard decisions for anonymous, forbidden and permitted users
//! - Root redirect, not-found and parameterized routes
//! - Sidebar filtering, semester badge and empty groups
//! - Menu files and legacy profile records

use portal_access::{
    build_visible_menu, AccessError, MenuSet, Navigation, RouteGuard, RouteTable, Sidebar,
};
use portal_core::{keys, Role, Session, UserProfile};
use portal_tests::prelude::*;

// =============================================================================
// Guard Tests
// =============================================================================

#[test]
fn test_access_anonymous_goes_to_login_everywhere_protected() {
    init_test_logging();
    let table = RouteTable::portal();
    let session = SessionBuilder::new().build().snapshot();

    for route in table.routes().iter().filter(|r| r.requires_auth) {
        let path = route.path.replace(":id", "1");
        assert_redirects(&table.navigate(&path, &session), "/login");
    }
}

#[test]
fn test_access_student_forbidden_on_admin_pages() {
    let table = RouteTable::portal();
    let session = SessionBuilder::new().role(Role::Student).build().snapshot();

    assert_redirects(&table.navigate("/admin/users", &session), "/403");
    assert_redirects(&table.navigate("/admin/users/9", &session), "/403");
    assert_redirects(&table.navigate("/questions", &session), "/403");
    assert_renders(&table.navigate("/quiz", &session), "quiz");
    assert_renders(&table.navigate("/forum/12", &session), "forum-post");
}

#[test]
fn test_access_admin_and_teacher_share_reports() {
    let table = RouteTable::portal();
    let admin = SessionBuilder::new().role(Role::Admin).build().snapshot();
    let teacher = SessionBuilder::new().role(Role::Teacher).build().snapshot();

    assert_renders(&table.navigate("/reports", &admin), "reports");
    assert_renders(&table.navigate("/reports", &teacher), "reports");
    assert_renders(&table.navigate("/admin/users/7", &admin), "admin-user-edit");
    assert_redirects(&table.navigate("/admin/dashboard", &teacher), "/403");
    assert_redirects(&table.navigate("/quiz", &teacher), "/403");
}

#[test]
fn test_access_unknown_stored_role_is_denied_on_restricted_routes() {
    let ctx = SessionBuilder::new().role(Role::Admin).build();
    ctx.store().set(keys::USER_ROLE, "superuser").unwrap();
    let session = ctx.snapshot();
    assert!(session.is_authenticated);
    assert_eq!(session.role, None);

    let table = RouteTable::portal();
    assert_redirects(&table.navigate("/admin/users", &session), "/403");
    assert_renders(&table.navigate("/perfil", &session), "profile");
}

#[test]
fn test_access_public_pages_render_for_anyone() {
    let table = RouteTable::portal();
    let anonymous = Session::anonymous();

    for path in ["/login", "/register", "/home", "/403", "/404"] {
        assert!(
            matches!(table.navigate(path, &anonymous), Navigation::Render(_)),
            "{} should render",
            path
        );
    }
}

#[test]
fn test_access_custom_guard_targets() {
    let table = RouteTable::portal().with_guard(RouteGuard::new("/ingreso", "/prohibido"));
    let student = SessionBuilder::new().role(Role::Student).build().snapshot();

    assert_redirects(&table.navigate("/perfil", &Session::anonymous()), "/ingreso");
    assert_redirects(&table.navigate("/admin/posts", &student), "/prohibido");
    assert_eq!(table.root_redirect(&Session::anonymous()), "/ingreso");
}

// =============================================================================
// Redirect Tests
// =============================================================================

#[test]
fn test_access_root_redirect_per_role() {
    let table = RouteTable::portal();

    let cases = [
        (Role::Admin, "/admin/dashboard"),
        (Role::Teacher, "/dashboard"),
        (Role::Student, "/perfil"),
    ];
    for (role, home) in cases {
        let session = SessionBuilder::new().role(role).build().snapshot();
        assert_redirects(&table.navigate("/", &session), home);
    }

    assert_redirects(&table.navigate("/", &Session::anonymous()), "/login");
}

#[test]
fn test_access_unknown_path_goes_to_not_found() {
    let table = RouteTable::portal();
    let admin = SessionBuilder::new().role(Role::Admin).build().snapshot();

    assert_redirects(&table.navigate("/does/not/exist", &admin), "/404");
    assert_redirects(&table.navigate("/forum/1/edit", &admin), "/404");
    assert_redirects(
        &table.navigate("/nowhere", &Session::anonymous()),
        "/404",
    );
}

#[test]
fn test_access_query_and_trailing_slash_ignored() {
    let table = RouteTable::portal();
    let teacher = SessionBuilder::new().role(Role::Teacher).build().snapshot();

    assert_renders(&table.navigate("/dashboard/", &teacher), "teacher-dashboard");
    assert_renders(&table.navigate("/forum?page=3", &teacher), "forum");
}

// =============================================================================
// Sidebar Tests
// =============================================================================

#[test]
fn test_access_teacher_sidebar_carries_semester() {
    let sidebar = Sidebar::default();
    let profile = ProfileFixtures::teacher("4");

    let menu = sidebar.visible_menu(Some(&profile));
    let dashboard = find_entry(&menu, "Dashboard");
    assert_eq!(dashboard.badge.as_ref().map(|b| b.text.as_str()), Some("4"));

    // The stored menus are not modified.
    let stored = find_entry(sidebar.menus().tree_for(Role::Teacher), "Dashboard");
    assert_eq!(
        stored.badge.as_ref().map(|b| b.text.as_str()),
        Some("Semestre")
    );
}

#[test]
fn test_access_teacher_without_semester_keeps_default_badge() {
    let sidebar = Sidebar::default();
    let profile = UserProfile::new("11", "Sin Semestre", Some(Role::Teacher)).with_semester("  ");

    let menu = sidebar.visible_menu(Some(&profile));
    let dashboard = find_entry(&menu, "Dashboard");
    assert_eq!(
        dashboard.badge.as_ref().map(|b| b.text.as_str()),
        Some("Semestre")
    );
}

#[test]
fn test_access_student_sidebar() {
    let sidebar = Sidebar::default();
    let menu = sidebar.visible_menu(Some(&ProfileFixtures::student()));

    assert_eq!(
        top_labels(&menu),
        vec!["Perfil", "Quiz", "Comunidad", "Plan de estudios"]
    );
    assert_hidden(&menu, "Usuarios");
}

#[test]
fn test_access_profile_without_role_sees_only_ungated_student_entries() {
    let sidebar = Sidebar::default();
    let profile = UserProfile::new("5", "Invitado", None);

    let menu = sidebar.visible_menu(Some(&profile));
    assert_hidden(&menu, "Quiz");
    assert_eq!(top_labels(&menu), vec!["Perfil", "Comunidad", "Plan de estudios"]);

    assert_eq!(sidebar.visible_menu(None), menu);
}

#[test]
fn test_access_sidebar_uses_profile_role_not_session_role() {
    let ctx = SessionBuilder::new()
        .role(Role::Admin)
        .profile(ProfileFixtures::student())
        .build();
    let session = ctx.snapshot();
    assert_eq!(session.role, Some(Role::Admin));
    assert_eq!(session.menu_role(), Some(Role::Student));

    let menu = Sidebar::default().visible_menu(session.current_user.as_ref());
    assert!(top_labels(&menu).contains(&"Quiz"));
    assert_hidden(&menu, "Gestión");
}

#[test]
fn test_access_filter_is_order_preserving_and_pure() {
    let tree = portal_access::portal_menus().tree_for(Role::Admin).to_vec();
    let before = tree.clone();

    let visible = build_visible_menu(&tree, Some(Role::Teacher));
    assert_eq!(tree, before);
    assert_eq!(top_labels(&visible), vec!["Comunidad", "Reportes"]);

    let again = build_visible_menu(&visible, Some(Role::Teacher));
    assert_eq!(again, visible);
}

// =============================================================================
// Menu File Tests
// =============================================================================

#[test]
fn test_access_menu_file_keeps_emptied_group() {
    let dir = temp_test_dir("menus");
    let path = dir.path().join("menus.yaml");
    std::fs::write(&path, MenuFixtures::yaml_with_teacher_only_group()).unwrap();

    let sidebar = Sidebar::new(MenuSet::load(&path).unwrap());
    let menu = sidebar.visible_menu(Some(&ProfileFixtures::admin()));

    assert_eq!(top_labels(&menu), vec!["Dashboard", "Docencia"]);
    let group = find_entry(&menu, "Docencia");
    assert_eq!(group.children().map(<[_]>::len), Some(0));
}

#[test]
fn test_access_menu_file_external_link() {
    let dir = temp_test_dir("menus");
    let path = dir.path().join("menus.yml");
    std::fs::write(&path, MenuFixtures::yaml_with_teacher_only_group()).unwrap();

    let menus = MenuSet::load(&path).unwrap();
    let campus = find_entry(menus.tree_for(Role::Student), "Campus");
    assert!(campus.target().unwrap().is_external());
}

#[test]
fn test_access_menu_file_rejects_entry_with_target_and_children() {
    let dir = temp_test_dir("menus");
    let path = dir.path().join("menus.json");
    std::fs::write(&path, MenuFixtures::json_with_invalid_entry()).unwrap();

    let err = MenuSet::load(&path).unwrap_err();
    assert!(matches!(err, AccessError::Parse { .. }), "got {:?}", err);
    assert!(err.to_string().contains("Roto"));
}

#[test]
fn test_access_menu_file_unsupported_extension() {
    let dir = temp_test_dir("menus");
    let path = dir.path().join("menus.ini");
    std::fs::write(&path, "admin = []").unwrap();

    assert!(matches!(
        MenuSet::load(&path),
        Err(AccessError::UnsupportedFormat { .. })
    ));
}

// =============================================================================
// Profile Record Tests
// =============================================================================

#[test]
fn test_access_legacy_profile_role_fields() {
    for (field, value, expected) in [
        ("role", "admin", Some(Role::Admin)),
        ("permission", "Profesor", Some(Role::Teacher)),
        ("type", "estudiante", Some(Role::Student)),
        ("type", "visitante", None),
    ] {
        let json = ProfileFixtures::legacy_json(field, value);
        let profile: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile.role, expected, "{} = {}", field, value);
        assert_eq!(profile.id, "77");
        assert_eq!(profile.assigned_semester(), Some("4"));
    }
}

#[test]
fn test_access_legacy_teacher_record_gets_badge() {
    let json = ProfileFixtures::legacy_json("permission", "docente");
    let profile: UserProfile = serde_json::from_str(&json).unwrap();

    let menu = Sidebar::default().visible_menu(Some(&profile));
    let dashboard = find_entry(&menu, "Dashboard");
    assert_eq!(dashboard.badge.as_ref().map(|b| b.text.as_str()), Some("4"));
}
