//! Sample registry loaded when `SEED_SAMPLE_DATA` is on.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use domain::{
    full_name, Account, AccountStatus, Plan, Role, SeatAllocation, Seats, User, UserStatus,
};

pub const TECHCORP_ID: Uuid = Uuid::from_u128(0x1);
pub const INNOVATELABS_ID: Uuid = Uuid::from_u128(0x2);
pub const QUANTUM_ID: Uuid = Uuid::from_u128(0x3);
pub const NEXGEN_ID: Uuid = Uuid::from_u128(0x4);

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn login(year: i32, month: u32, day: u32, hour: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).single()
}

fn seats(admin: (u32, u32), supervisor: (u32, u32), agent: (u32, u32)) -> Seats {
    Seats {
        admin: SeatAllocation::new(admin.0, admin.1),
        supervisor: SeatAllocation::new(supervisor.0, supervisor.1),
        agent: SeatAllocation::new(agent.0, agent.1),
    }
}

/// The four sample tenants.
pub fn sample_accounts() -> Vec<Account> {
    vec![
        Account {
            id: TECHCORP_ID,
            name: "TechCorp Solutions".to_string(),
            plan: Plan::Enterprise,
            status: AccountStatus::Active,
            contact_email: "admin@techcorp.com".to_string(),
            created_at: date(2024, 1, 15),
            next_renewal: Some(date(2024, 4, 15)),
            seats: seats((2, 5), (8, 10), (35, 35)),
            usage: 78,
            conversations_this_month: 1247,
            active_workflows: 24,
            account_manager: Some("Sarah Chen".to_string()),
        },
        Account {
            id: INNOVATELABS_ID,
            name: "InnovateLabs".to_string(),
            plan: Plan::Pro,
            status: AccountStatus::Trial,
            contact_email: "hello@innovatelabs.com".to_string(),
            created_at: date(2024, 2, 1),
            next_renewal: Some(date(2024, 3, 1)),
            seats: seats((2, 3), (4, 7), (6, 15)),
            usage: 92,
            conversations_this_month: 856,
            active_workflows: 8,
            account_manager: Some("Michael Torres".to_string()),
        },
        Account {
            id: QUANTUM_ID,
            name: "Quantum Dynamics".to_string(),
            plan: Plan::Free,
            status: AccountStatus::Active,
            contact_email: "contact@quantum.com".to_string(),
            created_at: date(2024, 1, 20),
            next_renewal: None,
            seats: seats((1, 1), (0, 1), (2, 3)),
            usage: 45,
            conversations_this_month: 234,
            active_workflows: 3,
            account_manager: Some("Jennifer Lee".to_string()),
        },
        Account {
            id: NEXGEN_ID,
            name: "NexGen Technologies".to_string(),
            plan: Plan::Enterprise,
            status: AccountStatus::Suspended,
            contact_email: "admin@nexgen.com".to_string(),
            created_at: date(2023, 11, 10),
            next_renewal: Some(date(2024, 5, 10)),
            seats: seats((3, 10), (10, 20), (15, 70)),
            usage: 65,
            conversations_this_month: 0,
            active_workflows: 15,
            account_manager: Some("David Kumar".to_string()),
        },
    ]
}

struct SampleUser {
    id: u128,
    name: (&'static str, &'static str),
    email: &'static str,
    role: Role,
    account: (Uuid, &'static str),
    status: UserStatus,
    last_login: Option<DateTime<Utc>>,
    tickets_handled: u64,
    conversations_processed: u64,
}

/// The eight sample users.
pub fn sample_users() -> Vec<User> {
    let techcorp = (TECHCORP_ID, "TechCorp Solutions");
    let innovatelabs = (INNOVATELABS_ID, "InnovateLabs");
    let quantum = (QUANTUM_ID, "Quantum Dynamics");

    let rows = [
        SampleUser {
            id: 0x101,
            name: ("Sarah", "Johnson"),
            email: "sarah@techcorp.com",
            role: Role::Admin,
            account: techcorp,
            status: UserStatus::Active,
            last_login: login(2024, 1, 27, 10, 30),
            tickets_handled: 156,
            conversations_processed: 892,
        },
        SampleUser {
            id: 0x102,
            name: ("Mike", "Chen"),
            email: "mike@techcorp.com",
            role: Role::Agent,
            account: techcorp,
            status: UserStatus::Active,
            last_login: login(2024, 1, 27, 9, 15),
            tickets_handled: 89,
            conversations_processed: 445,
        },
        SampleUser {
            id: 0x103,
            name: ("Alex", "Rivera"),
            email: "alex@innovatelabs.com",
            role: Role::Supervisor,
            account: innovatelabs,
            status: UserStatus::Active,
            last_login: login(2024, 1, 26, 16, 45),
            tickets_handled: 67,
            conversations_processed: 334,
        },
        SampleUser {
            id: 0x104,
            name: ("Emma", "Wilson"),
            email: "emma@quantum.com",
            role: Role::Admin,
            account: quantum,
            status: UserStatus::Pending,
            last_login: login(2024, 1, 25, 14, 20),
            tickets_handled: 23,
            conversations_processed: 156,
        },
        SampleUser {
            id: 0x105,
            name: ("David", "Kim"),
            email: "david.kim@techcorp.com",
            role: Role::Agent,
            account: techcorp,
            status: UserStatus::Active,
            last_login: login(2024, 1, 27, 11, 45),
            tickets_handled: 142,
            conversations_processed: 678,
        },
        SampleUser {
            id: 0x106,
            name: ("Lisa", "Anderson"),
            email: "lisa.anderson@techcorp.com",
            role: Role::Supervisor,
            account: techcorp,
            status: UserStatus::Active,
            last_login: login(2024, 1, 27, 8, 30),
            tickets_handled: 98,
            conversations_processed: 512,
        },
        SampleUser {
            id: 0x107,
            name: ("James", "Cooper"),
            email: "james@innovatelabs.com",
            role: Role::Agent,
            account: innovatelabs,
            status: UserStatus::Active,
            last_login: login(2024, 1, 26, 17, 20),
            tickets_handled: 76,
            conversations_processed: 389,
        },
        SampleUser {
            id: 0x108,
            name: ("Sofia", "Martinez"),
            email: "sofia@innovatelabs.com",
            role: Role::Admin,
            account: innovatelabs,
            status: UserStatus::Active,
            last_login: login(2024, 1, 27, 9, 0),
            tickets_handled: 54,
            conversations_processed: 267,
        },
    ];

    rows.into_iter()
        .map(|row| User {
            id: Uuid::from_u128(row.id),
            first_name: row.name.0.to_string(),
            last_name: row.name.1.to_string(),
            name: full_name(row.name.0, row.name.1),
            email: row.email.to_string(),
            role: row.role,
            account_id: row.account.0,
            account_name: row.account.1.to_string(),
            status: row.status,
            last_login: row.last_login,
            tickets_handled: row.tickets_handled,
            conversations_processed: row.conversations_processed,
        })
        .collect()
}
