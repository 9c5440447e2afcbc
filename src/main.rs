use actix_secure_headers::prelude::*;
use actix_secure_headers::SecureHeadersError;
use std::borrow::Cow;

fn main() -> Result<(), SecureHeadersError> {
    let user_agent = std::env::args().nth(1).unwrap_or_default();
    let registry = Registry::global();

    registry.configure(|config| {
        config.hsts(Hsts::new(31_536_000).include_subdomains());
        config.csp(
            CspPolicyBuilder::new()
                .default_src([Source::Self_])
                .script_src([Source::Self_, Source::StrictDynamic])
                .img_src([Source::Self_, Source::Scheme(Cow::Borrowed("data"))])
                .worker_src([Source::Self_])
                .report_uri("/csp-reports")
                .build()?,
        )?;
        Ok(())
    })?;

    registry.override_default("api", |config| {
        config.opt_out(HeaderKind::ContentSecurityPolicy);
        config.x_frame_options(XFrameOptions::Deny);
        Ok(())
    })?;

    let family = actix_secure_headers::UserAgent::parse(&user_agent).family();
    for name in registry.names() {
        if let Some(config) = registry.get(&name)? {
            println!("[{}] for {} browsers", name, family);
            for (header, value) in config.headers(&user_agent) {
                println!("  {}: {}", header, value.to_str().unwrap_or("<binary>"));
            }
        }
    }

    Ok(())
}
