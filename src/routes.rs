use crate::{
    api::{attendance, department, employee, inquiry, payroll, schedule, task},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));
    // Clock punching gets its own tighter budget
    let punch_limiter = Arc::new(build_limiter(config.rate_punch_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::resource("/job-titles").route(web::get().to(employee::list_job_titles)),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    )
                    .service(
                        web::resource("/{id}/assign")
                            .route(web::put().to(department::assign_department)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in")
                            .wrap(punch_limiter.clone())
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out")
                            .wrap(punch_limiter)
                            .route(web::put().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/logs")
                            .route(web::get().to(attendance::list_logs))
                            .route(web::post().to(attendance::create_log)),
                    )
                    .service(
                        web::resource("/logs/{id}").route(web::put().to(attendance::update_log)),
                    ),
            )
            .service(
                web::scope("/schedules")
                    .service(
                        web::resource("")
                            .route(web::get().to(schedule::list_schedules))
                            .route(web::post().to(schedule::create_schedule)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(schedule::get_schedule))
                            .route(web::put().to(schedule::update_schedule))
                            .route(web::delete().to(schedule::delete_schedule)),
                    ),
            )
            .service(
                web::scope("/tasks")
                    .service(
                        web::resource("")
                            .route(web::get().to(task::list_tasks))
                            .route(web::post().to(task::create_task)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(task::update_task))
                            .route(web::delete().to(task::delete_task)),
                    ),
            )
            .service(
                web::scope("/inquiries")
                    .service(
                        web::resource("")
                            .route(web::get().to(inquiry::list_inquiries))
                            .route(web::post().to(inquiry::submit_inquiry)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(inquiry::approve_inquiry)),
                    )
                    .service(
                        web::resource("/{id}/decline")
                            .route(web::put().to(inquiry::decline_inquiry)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("")
                            .route(web::post().to(payroll::create_payroll))
                            .route(web::get().to(payroll::list_payrolls)),
                    )
                    // registered before /{id} so the literal segment wins
                    .service(
                        web::resource("/hours-summary")
                            .route(web::get().to(payroll::hours_summary)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(payroll::get_payroll))
                            .route(web::put().to(payroll::update_payroll)),
                    ),
            ),
    );
}
