use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use leptos::prelude::*;

/// 管理员首页；只有守卫放行的 Admin 会话能到达这里
#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();
    let email = move || {
        auth.session
            .with(|s| s.as_ref().and_then(|s| s.email.clone()))
            .unwrap_or_default()
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Navbar title="Admin Dashboard" />
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">"Welcome, administrator"</h2>
                        <p class="text-base-content/70">"Signed in as " {email}</p>
                    </div>
                </div>
            </div>
        </div>
    }
}
