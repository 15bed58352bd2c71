// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The portal's built-in sidebar menus.

use once_cell::sync::Lazy;

use portal_core::Role::{Admin, Student, Teacher};

use crate::menu::{MenuEntry, MenuSet};

/// Label of the teacher entry that carries the semester badge.
pub const TEACHER_DASHBOARD_LABEL: &str = "Dashboard";

/// Target of the teacher entry that carries the semester badge.
pub const TEACHER_DASHBOARD_PATH: &str = "/dashboard";

static PORTAL_MENUS: Lazy<MenuSet> = Lazy::new(|| MenuSet {
    admin: admin_menu(),
    teacher: teacher_menu(),
    student: student_menu(),
});

/// Returns the built-in menus.
pub fn portal_menus() -> &'static MenuSet {
    &PORTAL_MENUS
}

fn community() -> MenuEntry {
    MenuEntry::group(
        "Comunidad",
        "chat",
        vec![
            MenuEntry::leaf("Foro", "forum", "/forum"),
            MenuEntry::leaf("Publicaciones", "newspaper", "/publications"),
        ],
    )
}

fn admin_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::leaf("Dashboard", "speedometer", "/admin/dashboard").permit(Admin),
        MenuEntry::group(
            "Gestión",
            "gear",
            vec![
                MenuEntry::leaf("Usuarios", "people", "/admin/users").permit(Admin),
                MenuEntry::leaf("Posts", "file-text", "/admin/posts").permit(Admin),
                MenuEntry::leaf("Publicaciones", "megaphone", "/admin/publications")
                    .permit(Admin),
                MenuEntry::leaf("Preguntas", "question-circle", "/questions")
                    .permit([Admin, Teacher]),
            ],
        )
        .permit(Admin),
        community(),
        MenuEntry::leaf("Reportes", "bar-chart", "/reports").permit([Admin, Teacher]),
    ]
}

fn teacher_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::leaf(TEACHER_DASHBOARD_LABEL, "speedometer", TEACHER_DASHBOARD_PATH)
            .with_badge("info", "Semestre")
            .permit(Teacher),
        MenuEntry::group(
            "Docencia",
            "book",
            vec![
                MenuEntry::leaf("Preguntas", "question-circle", "/questions")
                    .permit([Teacher, Admin]),
                MenuEntry::leaf("Reportes", "bar-chart", "/reports").permit([Teacher, Admin]),
                MenuEntry::leaf("Plan de estudios", "journal", "/plan"),
            ],
        ),
        community(),
        MenuEntry::leaf("Perfil", "person", "/perfil"),
    ]
}

fn student_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::leaf("Perfil", "person", "/perfil"),
        MenuEntry::leaf("Quiz", "controller", "/quiz")
            .with_badge("success", "Nuevo")
            .permit(Student),
        community(),
        MenuEntry::leaf("Plan de estudios", "journal", "/plan"),
    ]
}
